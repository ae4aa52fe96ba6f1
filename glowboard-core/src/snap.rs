//! Snapping engine for interactive drags.
//!
//! Sources are applied in a fixed order, each one free to overwrite the
//! position chosen by an earlier one on the same axis:
//!
//! 1. panel divisions (half, one third, two thirds), element centered on the line
//! 2. sibling edges and centers, last matching sibling wins
//! 3. the 20px grid, only when neither of the above produced a guide
//!
//! Every source compares against the proposed position, never against a
//! position already snapped by an earlier source.

use serde::{Deserialize, Serialize};

use crate::free_space::GRID_STEP;
use crate::geometry::{Point, Rect};
use crate::{Element, Panel};

/// Maximum distance, in pixels, at which a snap source captures the element.
pub const SNAP_TOLERANCE: f32 = 15.0;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    /// A vertical line at an x coordinate.
    Vertical,
    /// A horizontal line at a y coordinate.
    Horizontal,
}

/// A transient alignment line produced while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    /// Line orientation.
    pub orientation: GuideOrientation,
    /// X for vertical lines, y for horizontal lines.
    pub position: f32,
}

impl Guide {
    /// A vertical guide at `x`.
    #[must_use]
    pub const fn vertical(x: f32) -> Self {
        Self {
            orientation: GuideOrientation::Vertical,
            position: x,
        }
    }

    /// A horizontal guide at `y`.
    #[must_use]
    pub const fn horizontal(y: f32) -> Self {
        Self {
            orientation: GuideOrientation::Horizontal,
            position: y,
        }
    }
}

/// Snapped position plus the guides that fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    /// Snapped x.
    pub x: f32,
    /// Snapped y.
    pub y: f32,
    /// Guides to render for this frame.
    pub guides: Vec<Guide>,
}

/// One axis of a rectangle: leading coordinate and length.
#[derive(Clone, Copy)]
struct Span {
    start: f32,
    len: f32,
}

impl Span {
    fn end(self) -> f32 {
        self.start + self.len
    }

    fn center(self) -> f32 {
        self.start + self.len / 2.0
    }

    fn horizontal(rect: &Rect) -> Self {
        Self {
            start: rect.x,
            len: rect.width,
        }
    }

    fn vertical(rect: &Rect) -> Self {
        Self {
            start: rect.y,
            len: rect.height,
        }
    }
}

fn within_tolerance(a: f32, b: f32) -> bool {
    (a - b).abs() < SNAP_TOLERANCE
}

/// Center the span on the first panel division it is close to.
///
/// Returns the new leading coordinate and the division line.
fn snap_to_division(span: Span, panel_len: f32) -> Option<(f32, f32)> {
    let divisions = [panel_len / 2.0, panel_len / 3.0, panel_len * 2.0 / 3.0];
    divisions
        .into_iter()
        .find(|line| within_tolerance(span.center(), *line))
        .map(|line| (line - span.len / 2.0, line))
}

/// Align the span to a sibling span using the first matching pair.
///
/// Pairs in order: leading edges, trailing edges, leading to trailing,
/// trailing to leading, centers. Returns the new leading coordinate and the
/// sibling coordinate the guide is drawn at.
fn snap_to_sibling(span: Span, other: Span) -> Option<(f32, f32)> {
    if within_tolerance(span.start, other.start) {
        Some((other.start, other.start))
    } else if within_tolerance(span.end(), other.end()) {
        Some((other.end() - span.len, other.end()))
    } else if within_tolerance(span.start, other.end()) {
        Some((other.end(), other.end()))
    } else if within_tolerance(span.end(), other.start) {
        Some((other.start - span.len, other.start))
    } else if within_tolerance(span.center(), other.center()) {
        Some((other.center() - span.len / 2.0, other.center()))
    } else {
        None
    }
}

fn snap_to_grid(value: f32) -> f32 {
    (value / GRID_STEP).round() * GRID_STEP
}

/// Snap a dragged element's proposed position.
///
/// `siblings` may include the element itself; it is skipped by id. The
/// inputs are never modified.
#[must_use]
pub fn snap(
    element: &Element,
    proposed_x: f32,
    proposed_y: f32,
    siblings: &[Element],
    panel: &Panel,
) -> SnapResult {
    let proposed = element
        .geometry
        .moved_to(Point::new(proposed_x, proposed_y));
    let span_x = Span::horizontal(&proposed);
    let span_y = Span::vertical(&proposed);

    let mut x = proposed_x;
    let mut y = proposed_y;
    let mut guides = Vec::new();

    if let Some((snapped, line)) = snap_to_division(span_x, panel.width) {
        x = snapped;
        guides.push(Guide::vertical(line));
    }
    if let Some((snapped, line)) = snap_to_division(span_y, panel.height) {
        y = snapped;
        guides.push(Guide::horizontal(line));
    }

    for sibling in siblings.iter().filter(|s| s.id != element.id) {
        if let Some((snapped, line)) =
            snap_to_sibling(span_x, Span::horizontal(&sibling.geometry))
        {
            x = snapped;
            guides.push(Guide::vertical(line));
        }
        if let Some((snapped, line)) = snap_to_sibling(span_y, Span::vertical(&sibling.geometry)) {
            y = snapped;
            guides.push(Guide::horizontal(line));
        }
    }

    if guides.is_empty() {
        x = snap_to_grid(proposed_x);
        y = snap_to_grid(proposed_y);
    }

    SnapResult { x, y, guides }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(x: f32, y: f32, w: f32, h: f32) -> Element {
        Element::text("snap").with_geometry(Rect::new(x, y, w, h))
    }

    #[test]
    fn test_panel_center_snap() {
        let moving = element(0.0, 0.0, 100.0, 40.0);
        // center at 395, within 15px of 400
        let result = snap(&moving, 345.0, 20.0, &[], &Panel::default());
        assert!((result.x - 350.0).abs() < f32::EPSILON);
        assert!((result.y - 20.0).abs() < f32::EPSILON);
        assert_eq!(result.guides, vec![Guide::vertical(400.0)]);
    }

    #[test]
    fn test_panel_third_snap_on_y() {
        let moving = element(0.0, 0.0, 100.0, 40.0);
        let panel = Panel::new(900.0, 300.0).expect("valid panel");
        // center y = 95, one third = 100
        let result = snap(&moving, 47.0, 75.0, &[], &panel);
        assert!((result.y - 80.0).abs() < f32::EPSILON);
        assert_eq!(result.guides, vec![Guide::horizontal(100.0)]);
        // no grid snap once a guide fired
        assert!((result.x - 47.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_grid_fallback_when_nothing_aligns() {
        let moving = element(0.0, 0.0, 50.0, 50.0);
        let result = snap(&moving, 47.0, 52.0, &[], &Panel::default());
        assert!((result.x - 40.0).abs() < f32::EPSILON);
        assert!((result.y - 60.0).abs() < f32::EPSILON);
        assert!(result.guides.is_empty());
    }

    #[test]
    fn test_sibling_leading_edge_snap() {
        let moving = element(0.0, 0.0, 50.0, 30.0);
        let sibling = element(100.0, 300.0, 80.0, 30.0);
        let result = snap(&moving, 108.0, 42.0, &[sibling], &Panel::default());
        assert!((result.x - 100.0).abs() < f32::EPSILON);
        assert!(result.guides.contains(&Guide::vertical(100.0)));
    }

    #[test]
    fn test_sibling_trailing_to_leading_snap() {
        let moving = element(0.0, 0.0, 50.0, 30.0);
        let sibling = element(200.0, 300.0, 80.0, 30.0);
        // right edge at 190, sibling left at 200
        let result = snap(&moving, 140.0, 42.0, &[sibling], &Panel::default());
        assert!((result.x - 150.0).abs() < f32::EPSILON);
        assert!(result.guides.contains(&Guide::vertical(200.0)));
    }

    #[test]
    fn test_last_sibling_wins() {
        let moving = element(0.0, 0.0, 40.0, 30.0);
        let first = element(100.0, 300.0, 60.0, 30.0);
        let second = element(105.0, 200.0, 60.0, 30.0);
        let result = snap(&moving, 102.0, 42.0, &[first, second], &Panel::default());
        assert!((result.x - 105.0).abs() < f32::EPSILON);
        assert_eq!(
            result
                .guides
                .iter()
                .filter(|g| g.orientation == GuideOrientation::Vertical)
                .count(),
            2
        );
    }

    #[test]
    fn test_self_is_not_a_sibling() {
        let moving = element(100.0, 100.0, 50.0, 50.0);
        let result = snap(&moving, 103.0, 223.0, &[moving.clone()], &Panel::default());
        assert!(result.guides.is_empty());
        assert!((result.x - 100.0).abs() < f32::EPSILON);
        assert!((result.y - 220.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_snap_is_deterministic() {
        let moving = element(0.0, 0.0, 60.0, 40.0);
        let siblings = vec![element(200.0, 100.0, 60.0, 40.0), element(10.0, 300.0, 90.0, 40.0)];
        let a = snap(&moving, 190.0, 110.0, &siblings, &Panel::default());
        let b = snap(&moving, 190.0, 110.0, &siblings, &Panel::default());
        assert_eq!(a, b);
    }
}
