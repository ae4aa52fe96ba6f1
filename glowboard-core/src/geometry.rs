//! Geometry and collision primitives.
//!
//! Every spatial algorithm in the crate reduces to the buffered overlap test
//! in [`overlaps`]. Rotation never enters collision geometry: elements are
//! always tested by their unrotated axis-aligned bounds.

use serde::{Deserialize, Serialize};

use crate::{Element, ElementId, Panel};

/// Minimum empty margin enforced between any two elements, in pixels.
pub const COLLISION_BUFFER: f32 = 5.0;

/// A position in panel-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X position (pixels from left).
    pub x: f32,
    /// Y position (pixels from top).
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Top-left anchored rectangle in panel-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position of the left edge.
    pub x: f32,
    /// Y position of the top edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from a position and a size.
    #[must_use]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Right edge x-coordinate.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Same size, moved to `origin`.
    #[must_use]
    pub const fn moved_to(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    /// Same origin, resized to `size`.
    #[must_use]
    pub const fn resized_to(&self, size: Size) -> Self {
        Self::new(self.x, self.y, size.width, size.height)
    }

    /// Clamp the origin so the rectangle stays inside the panel.
    ///
    /// When the rectangle is larger than the panel the origin pins to zero.
    #[must_use]
    pub fn clamp_into(&self, panel: &Panel) -> Self {
        let x = clamp_axis(self.x, 0.0, panel.width - self.width);
        let y = clamp_axis(self.y, 0.0, panel.height - self.height);
        self.moved_to(Point::new(x, y))
    }
}

/// Clamp `value` into `[min, max]`, letting `min` win when the range is empty.
///
/// `f32::clamp` panics on an inverted range, which happens whenever an
/// element is larger than the space it is clamped into.
#[must_use]
pub(crate) fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Test whether two rectangles collide once each is expanded by `buffer`.
///
/// The rectangles are apart iff one lies entirely to one side of the other
/// with at least `buffer` pixels between them.
#[must_use]
pub fn overlaps(a: &Rect, b: &Rect, buffer: f32) -> bool {
    let apart = a.right() + buffer <= b.x
        || a.x >= b.right() + buffer
        || a.bottom() + buffer <= b.y
        || a.y >= b.bottom() + buffer;
    !apart
}

/// Test `rect` against every rectangle in `others` with the standard buffer.
#[must_use]
pub fn collides_with_any<'a>(rect: &Rect, others: impl IntoIterator<Item = &'a Rect>) -> bool {
    others
        .into_iter()
        .any(|other| overlaps(rect, other, COLLISION_BUFFER))
}

/// List every pair of elements that violates the collision invariant.
///
/// Pairs are reported in input order, first index before second.
#[must_use]
pub fn find_collisions(elements: &[Element]) -> Vec<(ElementId, ElementId)> {
    let mut pairs = Vec::new();
    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i + 1..] {
            if overlaps(&a.geometry, &b.geometry, COLLISION_BUFFER) {
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs
}

/// Check the collision invariant over a whole element list.
#[must_use]
pub fn satisfies_invariant(elements: &[Element]) -> bool {
    find_collisions(elements).is_empty()
}
