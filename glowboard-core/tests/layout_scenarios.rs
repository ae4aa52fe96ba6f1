//! Layout Engine Scenario Tests
//!
//! End-to-end checks of the layout engine through its public API:
//! - Placement of new elements from the scan origin
//! - Snapping to panel divisions while dragging
//! - Duplicate placement around a colliding offset
//! - Resize shrinking to the largest clear step
//! - Nudges blocked by the collision buffer

use glowboard_core::ops::{add_element, duplicate_element, nudge_element, NUDGE_STEP};
use glowboard_core::{
    overlaps, satisfies_invariant, snap, CollisionService, EditorCommand, EditorState, Element,
    Guide, NudgeDirection, Outcome, Panel, Rect, Rejection, Size, COLLISION_BUFFER,
};

fn element_at(x: f32, y: f32, width: f32, height: f32) -> Element {
    Element::text("element").with_geometry(Rect::new(x, y, width, height))
}

// ============================================================================
// Scenario A: adding from the scan origin
// ============================================================================

#[test]
fn test_add_lands_at_first_raster_cell() {
    let existing = element_at(100.0, 100.0, 100.0, 40.0);
    let next = add_element(
        &[existing.clone()],
        &Panel::default(),
        Element::text("new"),
    )
    .expect("panel has space");

    let added = &next[1];
    assert_eq!(added.geometry, Rect::new(10.0, 10.0, 120.0, 40.0));
    assert!(!overlaps(&added.geometry, &existing.geometry, COLLISION_BUFFER));
}

#[test]
fn test_add_through_editor_matches_operation() {
    let existing = element_at(100.0, 100.0, 100.0, 40.0);
    let mut state = EditorState::with_elements(Panel::default(), vec![existing]);

    let outcome = state.dispatch(EditorCommand::AddText {
        content: "new".to_string(),
    });
    assert_eq!(outcome, Outcome::Committed { version: 1 });
    assert_eq!(
        state.elements()[1].geometry,
        Rect::new(10.0, 10.0, 120.0, 40.0)
    );
}

// ============================================================================
// Scenario B: snapping to the panel half while dragging
// ============================================================================

#[test]
fn test_drag_center_snaps_to_panel_half() {
    let moving = element_at(20.0, 20.0, 100.0, 40.0);

    for proposed_x in [336.0, 341.0, 350.0, 359.0, 364.0] {
        let result = snap(&moving, proposed_x, 20.0, &[], &Panel::default());
        assert!(
            (result.x + 50.0 - 400.0).abs() < f32::EPSILON,
            "center should land on 400 from x = {proposed_x}"
        );
        assert_eq!(result.guides, vec![Guide::vertical(400.0)]);
    }
}

#[test]
fn test_drag_frame_reports_guide() {
    let mut state = EditorState::default();
    state.dispatch(EditorCommand::AddText {
        content: "drag me".to_string(),
    });
    let id = state.elements()[0].id;

    state.dispatch(EditorCommand::DragStart { id });
    // 120px wide: center at 402 for x = 342
    let Outcome::Frame(update) = state.dispatch(EditorCommand::DragMove { x: 342.0, y: 20.0 })
    else {
        panic!("expected a frame");
    };
    assert!((update.geometry.center_x() - 400.0).abs() < f32::EPSILON);
    assert!(update.guides.contains(&Guide::vertical(400.0)));
}

// ============================================================================
// Scenario C: duplicate whose naive offset would collide
// ============================================================================

#[test]
fn test_duplicate_clears_source() {
    let source = element_at(0.0, 0.0, 100.0, 50.0);
    let naive = Rect::new(20.0, 20.0, 100.0, 50.0);
    assert!(overlaps(&naive, &source.geometry, COLLISION_BUFFER));

    let next = duplicate_element(&[source.clone()], &Panel::default(), source.id)
        .expect("panel has space");
    let copy = &next[1];
    assert_ne!(copy.id, source.id);
    assert!(!overlaps(&copy.geometry, &source.geometry, COLLISION_BUFFER));
    assert!(satisfies_invariant(&next));
}

// ============================================================================
// Scenario D: resize shrinks to the largest clear step
// ============================================================================

#[test]
fn test_resize_settles_on_largest_clear_step() {
    let target = element_at(10.0, 10.0, 100.0, 100.0);
    // Neighbours leave exactly 150px plus the buffer on both axes.
    let right = element_at(165.0, 10.0, 100.0, 100.0);
    let below = element_at(10.0, 165.0, 100.0, 100.0);
    let elements = vec![target.clone(), right, below];

    let service = CollisionService::new(&elements, Panel::default());
    let rect = service
        .get_safe_resize(target.id, Size::new(300.0, 300.0), None)
        .expect("known element");

    assert_eq!(rect, Rect::new(10.0, 10.0, 150.0, 150.0));
}

#[test]
fn test_resize_without_clear_step_keeps_original() {
    let target = element_at(10.0, 10.0, 100.0, 100.0);
    let right = element_at(116.0, 10.0, 100.0, 100.0);
    let elements = vec![target.clone(), right];

    let service = CollisionService::new(&elements, Panel::default());
    let rect = service.get_safe_resize(target.id, Size::new(300.0, 300.0), None);

    assert_eq!(rect, Some(target.geometry));
}

// ============================================================================
// Scenario E: nudge into the buffer is rejected
// ============================================================================

#[test]
fn test_nudge_into_buffer_rejected() {
    let moving = element_at(0.0, 0.0, 100.0, 50.0);
    let neighbour = element_at(105.5, 0.0, 100.0, 50.0);
    let elements = vec![moving.clone(), neighbour];

    let result = nudge_element(
        &elements,
        &Panel::default(),
        moving.id,
        NudgeDirection::Right,
        NUDGE_STEP,
    );
    assert_eq!(result, Err(Rejection::Blocked));
}

#[test]
fn test_nudge_outside_buffer_allowed() {
    let moving = element_at(0.0, 0.0, 100.0, 50.0);
    let neighbour = element_at(106.5, 0.0, 100.0, 50.0);
    let elements = vec![moving.clone(), neighbour];

    let next = nudge_element(
        &elements,
        &Panel::default(),
        moving.id,
        NudgeDirection::Right,
        NUDGE_STEP,
    )
    .expect("still outside the buffer");
    assert!((next[0].geometry.x - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_blocked_nudge_leaves_editor_unchanged() {
    let moving = element_at(0.0, 0.0, 100.0, 50.0);
    let neighbour = element_at(105.5, 0.0, 100.0, 50.0);
    let mut state = EditorState::with_elements(Panel::default(), vec![moving.clone(), neighbour]);
    let before = state.snapshot();

    let outcome = state.dispatch(EditorCommand::Nudge {
        id: moving.id,
        direction: NudgeDirection::Right,
        large: false,
    });

    assert_eq!(outcome, Outcome::Rejected(Rejection::Blocked));
    assert_eq!(state.elements(), &before[..]);
    assert!(state.notice().is_none());
    assert!(!state.can_undo());
}
