//! Layout mutation operations.
//!
//! Each operation reads the current snapshot, computes a legal target
//! geometry through [`CollisionService`], and returns the complete next
//! snapshot. A mutation that cannot be made legal is rejected and the
//! caller keeps its previous snapshot.

use thiserror::Error;

use crate::collision::CollisionService;
use crate::element::{normalize_rotation, sanitize_geometry};
use crate::free_space::{find_free_space, EDGE_PADDING};
use crate::geometry::{collides_with_any, Point, Rect};
use crate::{Element, ElementId, Panel};

/// Offset applied to duplicated and pasted elements, per axis.
pub const COPY_OFFSET: f32 = 20.0;

/// Where free-space search starts for newly added elements.
pub const SCAN_ORIGIN: Point = Point::new(EDGE_PADDING, EDGE_PADDING);

/// Nudge distance without modifier, in pixels.
pub const NUDGE_STEP: f32 = 1.0;

/// Nudge distance with the modifier held, in pixels.
pub const NUDGE_STEP_LARGE: f32 = 10.0;

/// Why a mutation left the element list unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Free-space search found no slot for the element.
    #[error("No space available on the panel")]
    NoSpace,

    /// The target position would collide and the operation does not relocate.
    #[error("Move blocked by a neighbouring element")]
    Blocked,

    /// The target element is no longer in the list.
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),
}

/// Outcome of a mutation: the next snapshot or the reason there is none.
pub type MutationResult = Result<Vec<Element>, Rejection>;

/// Direction of a keyboard nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeDirection {
    /// Toward smaller x.
    Left,
    /// Toward larger x.
    Right,
    /// Toward smaller y.
    Up,
    /// Toward larger y.
    Down,
}

impl NudgeDirection {
    /// Map a keyboard key name to a direction.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            _ => None,
        }
    }

    fn delta(self, step: f32) -> (f32, f32) {
        match self {
            Self::Left => (-step, 0.0),
            Self::Right => (step, 0.0),
            Self::Up => (0.0, -step),
            Self::Down => (0.0, step),
        }
    }
}

fn position_of(elements: &[Element], id: ElementId) -> Result<usize, Rejection> {
    elements
        .iter()
        .position(|e| e.id == id)
        .ok_or(Rejection::ElementNotFound(id))
}

/// Add a new element in the first free slot from the scan origin.
///
/// The element's own position is ignored; only its size is used.
///
/// # Errors
///
/// Returns [`Rejection::NoSpace`] when the panel has no room for it.
pub fn add_element(elements: &[Element], panel: &Panel, mut element: Element) -> MutationResult {
    let size = sanitize_geometry(element.geometry).size();
    let occupied: Vec<Rect> = elements.iter().map(|e| e.geometry).collect();
    let origin = find_free_space(SCAN_ORIGIN, size, &occupied, panel).ok_or_else(|| {
        tracing::warn!(id = %element.id, "No space to add element");
        Rejection::NoSpace
    })?;

    element.geometry = Rect::from_parts(origin, size);
    element.rotation = normalize_rotation(element.rotation);
    tracing::debug!(id = %element.id, ?origin, "Added element");

    let mut next = elements.to_vec();
    next.push(element);
    Ok(next)
}

/// Place a copy next to its source, falling back to free-space search.
fn place_copy(elements: &[Element], panel: &Panel, source: &Element) -> Result<Element, Rejection> {
    let mut copy = source.duplicate();
    let geometry = sanitize_geometry(copy.geometry);
    if !panel.fits(geometry.size()) {
        tracing::warn!(source = %source.id, "Copy is larger than the panel");
        return Err(Rejection::NoSpace);
    }
    let candidate = geometry
        .moved_to(Point::new(geometry.x + COPY_OFFSET, geometry.y + COPY_OFFSET))
        .clamp_into(panel);

    let origin = CollisionService::new(elements, *panel)
        .place_new(candidate)
        .ok_or_else(|| {
            tracing::warn!(source = %source.id, "No space to place copy");
            Rejection::NoSpace
        })?;

    copy.geometry = candidate.moved_to(origin);
    copy.rotation = normalize_rotation(copy.rotation);
    Ok(copy)
}

/// Duplicate an element, offset by [`COPY_OFFSET`] from the source.
///
/// # Errors
///
/// Returns [`Rejection::ElementNotFound`] for an unknown id and
/// [`Rejection::NoSpace`] when the copy cannot be placed.
pub fn duplicate_element(elements: &[Element], panel: &Panel, id: ElementId) -> MutationResult {
    let index = position_of(elements, id)?;
    let copy = place_copy(elements, panel, &elements[index])?;
    tracing::debug!(source = %id, copy = %copy.id, "Duplicated element");

    let mut next = elements.to_vec();
    next.push(copy);
    Ok(next)
}

/// Paste clipboard elements, each offset from its copied position.
///
/// Elements are placed one at a time against the growing list. The paste is
/// all or nothing: if any element finds no space, none are added.
///
/// # Errors
///
/// Returns [`Rejection::NoSpace`] when any pasted element cannot be placed.
pub fn paste_elements(elements: &[Element], panel: &Panel, clipboard: &[Element]) -> MutationResult {
    let mut next = elements.to_vec();
    for source in clipboard {
        let copy = place_copy(&next, panel, source)?;
        next.push(copy);
    }
    tracing::debug!(count = clipboard.len(), "Pasted elements");
    Ok(next)
}

/// Nudge an element by one step, rejecting the move on any collision.
///
/// Unlike a drag, a blocked nudge never searches for another slot.
///
/// # Errors
///
/// Returns [`Rejection::ElementNotFound`] for an unknown id and
/// [`Rejection::Blocked`] when the nudged position collides.
pub fn nudge_element(
    elements: &[Element],
    panel: &Panel,
    id: ElementId,
    direction: NudgeDirection,
    step: f32,
) -> MutationResult {
    let index = position_of(elements, id)?;
    let current = elements[index].geometry;
    let (dx, dy) = direction.delta(step);
    let candidate = current
        .moved_to(Point::new(current.x + dx, current.y + dy))
        .clamp_into(panel);

    let others: Vec<Rect> = elements
        .iter()
        .filter(|e| e.id != id)
        .map(|e| e.geometry)
        .collect();
    if collides_with_any(&candidate, &others) {
        tracing::debug!(%id, ?direction, "Nudge blocked");
        return Err(Rejection::Blocked);
    }

    let mut next = elements.to_vec();
    next[index].geometry = candidate;
    Ok(next)
}

/// Replace an element's geometry with an already validated rectangle.
///
/// # Errors
///
/// Returns [`Rejection::ElementNotFound`] for an unknown id.
pub fn set_geometry(elements: &[Element], id: ElementId, geometry: Rect) -> MutationResult {
    let index = position_of(elements, id)?;
    let mut next = elements.to_vec();
    next[index].geometry = geometry;
    Ok(next)
}

/// Set an element's rotation. Rotation never affects collision geometry.
///
/// # Errors
///
/// Returns [`Rejection::ElementNotFound`] for an unknown id.
pub fn rotate_element(elements: &[Element], id: ElementId, degrees: f32) -> MutationResult {
    let index = position_of(elements, id)?;
    let mut next = elements.to_vec();
    next[index].rotation = normalize_rotation(degrees);
    Ok(next)
}

/// Remove an element.
///
/// # Errors
///
/// Returns [`Rejection::ElementNotFound`] for an unknown id.
pub fn delete_element(elements: &[Element], id: ElementId) -> MutationResult {
    let index = position_of(elements, id)?;
    let mut next = elements.to_vec();
    next.remove(index);
    Ok(next)
}

/// Move an element to the end of the list (drawn last, on top).
///
/// # Errors
///
/// Returns [`Rejection::ElementNotFound`] for an unknown id.
pub fn bring_to_front(elements: &[Element], id: ElementId) -> MutationResult {
    let index = position_of(elements, id)?;
    let mut next = elements.to_vec();
    let element = next.remove(index);
    next.push(element);
    Ok(next)
}

/// Move an element to the start of the list (drawn first, underneath).
///
/// # Errors
///
/// Returns [`Rejection::ElementNotFound`] for an unknown id.
pub fn send_to_back(elements: &[Element], id: ElementId) -> MutationResult {
    let index = position_of(elements, id)?;
    let mut next = elements.to_vec();
    let element = next.remove(index);
    next.insert(0, element);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::satisfies_invariant;

    fn at(x: f32, y: f32, w: f32, h: f32) -> Element {
        Element::text("e").with_geometry(Rect::new(x, y, w, h))
    }

    #[test]
    fn test_add_uses_scan_origin() {
        let existing = at(100.0, 100.0, 100.0, 40.0);
        let next = add_element(&[existing], &Panel::default(), Element::text("new"))
            .expect("space available");
        assert_eq!(next.len(), 2);
        assert_eq!(next[1].geometry, Rect::new(10.0, 10.0, 120.0, 40.0));
    }

    #[test]
    fn test_add_sanitizes_malformed_size() {
        let element = Element::icon("star").with_geometry(Rect::new(0.0, 0.0, f32::NAN, -3.0));
        let next = add_element(&[], &Panel::default(), element).expect("space available");
        assert_eq!(next[0].geometry.size(), crate::FALLBACK_SIZE);
    }

    #[test]
    fn test_add_rejected_on_full_panel() {
        let wall = at(0.0, 0.0, 800.0, 400.0);
        let result = add_element(&[wall], &Panel::default(), Element::text("new"));
        assert_eq!(result, Err(Rejection::NoSpace));
    }

    #[test]
    fn test_duplicate_offsets_when_clear() {
        let source = at(0.0, 0.0, 10.0, 10.0);
        let next = duplicate_element(&[source.clone()], &Panel::default(), source.id)
            .expect("space available");
        assert_eq!(next[1].geometry, Rect::new(20.0, 20.0, 10.0, 10.0));
        assert_ne!(next[1].id, source.id);
    }

    #[test]
    fn test_duplicate_relocates_when_offset_collides() {
        let source = at(0.0, 0.0, 100.0, 50.0);
        let next = duplicate_element(&[source.clone()], &Panel::default(), source.id)
            .expect("space available");
        assert!(satisfies_invariant(&next));
    }

    #[test]
    fn test_duplicate_unknown_id() {
        let result = duplicate_element(&[], &Panel::default(), ElementId::new());
        assert!(matches!(result, Err(Rejection::ElementNotFound(_))));
    }

    #[test]
    fn test_paste_is_all_or_nothing() {
        let panel = Panel::new(200.0, 100.0).expect("valid panel");
        let existing = at(10.0, 10.0, 60.0, 60.0);
        let clipboard = vec![at(10.0, 10.0, 60.0, 60.0), at(10.0, 10.0, 60.0, 60.0)];
        // Room for exactly one more 60x60 element.
        let result = paste_elements(&[existing], &panel, &clipboard);
        assert_eq!(result, Err(Rejection::NoSpace));
    }

    #[test]
    fn test_paste_rejects_element_larger_than_panel() {
        let clipboard = vec![at(0.0, 0.0, 2000.0, 50.0)];
        let result = paste_elements(&[], &Panel::default(), &clipboard);
        assert_eq!(result, Err(Rejection::NoSpace));
    }

    #[test]
    fn test_paste_places_each_element() {
        let clipboard = vec![at(100.0, 100.0, 50.0, 50.0), at(100.0, 100.0, 50.0, 50.0)];
        let next = paste_elements(&[], &Panel::default(), &clipboard).expect("space available");
        assert_eq!(next.len(), 2);
        assert!(satisfies_invariant(&next));
        assert_ne!(next[0].id, clipboard[0].id);
    }

    #[test]
    fn test_nudge_moves_when_clear() {
        let a = at(100.0, 100.0, 50.0, 50.0);
        let next = nudge_element(
            &[a.clone()],
            &Panel::default(),
            a.id,
            NudgeDirection::Right,
            NUDGE_STEP_LARGE,
        )
        .expect("clear");
        assert_eq!(next[0].geometry.origin(), Point::new(110.0, 100.0));
    }

    #[test]
    fn test_nudge_clamps_to_panel() {
        let a = at(0.0, 0.0, 50.0, 50.0);
        let next = nudge_element(&[a.clone()], &Panel::default(), a.id, NudgeDirection::Up, 1.0)
            .expect("clear");
        assert_eq!(next[0].geometry.origin(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_nudge_blocked_by_neighbour() {
        let a = at(0.0, 0.0, 100.0, 50.0);
        let b = at(105.5, 0.0, 100.0, 50.0);
        let elements = vec![a.clone(), b];
        let result = nudge_element(&elements, &Panel::default(), a.id, NudgeDirection::Right, 1.0);
        assert_eq!(result, Err(Rejection::Blocked));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(NudgeDirection::from_key("ArrowLeft"), Some(NudgeDirection::Left));
        assert_eq!(NudgeDirection::from_key("ArrowDown"), Some(NudgeDirection::Down));
        assert_eq!(NudgeDirection::from_key("Enter"), None);
    }

    #[test]
    fn test_reorder() {
        let a = at(0.0, 0.0, 10.0, 10.0);
        let b = at(100.0, 0.0, 10.0, 10.0);
        let c = at(200.0, 0.0, 10.0, 10.0);
        let elements = vec![a.clone(), b.clone(), c.clone()];

        let front = bring_to_front(&elements, a.id).expect("known");
        assert_eq!(
            front.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![b.id, c.id, a.id]
        );
        let back = send_to_back(&elements, c.id).expect("known");
        assert_eq!(
            back.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![c.id, a.id, b.id]
        );
    }

    #[test]
    fn test_rotate_and_delete() {
        let a = at(0.0, 0.0, 10.0, 10.0);
        let rotated = rotate_element(&[a.clone()], a.id, 400.0).expect("known");
        assert!((rotated[0].rotation - 180.0).abs() < f32::EPSILON);
        assert_eq!(rotated[0].geometry, a.geometry);

        let deleted = delete_element(&rotated, a.id).expect("known");
        assert!(deleted.is_empty());
        assert!(delete_element(&deleted, a.id).is_err());
    }
}
