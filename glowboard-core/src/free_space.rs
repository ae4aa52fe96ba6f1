//! Free-space search.
//!
//! Finds a position near a preferred point where a rectangle of a given size
//! fits without colliding with any occupied rectangle.
//!
//! ```text
//!   pass 1: spiral rings            pass 2: raster grid
//!
//!        ·  ·  ·                    → → → → → →
//!     ·   · · ·   ·                 → → → → → →
//!     ·  · (p) ·  ·                 → → → → → →
//!     ·   · · ·   ·
//!        ·  ·  ·                    first free cell wins
//!   r = 0, 20, ... < 200, 8 angles
//! ```
//!
//! Rings are exhausted nearest-first, so the result is the closest slot in
//! ring/angle order, not necessarily the Euclidean nearest: clamping near the
//! panel edges can fold several angles onto the same point.

use crate::geometry::{clamp_axis, collides_with_any, Point, Rect, Size};
use crate::Panel;

/// Step between spiral rings and between grid cells, in pixels.
pub const GRID_STEP: f32 = 20.0;

/// Distance kept between a searched position and the panel edges.
pub const EDGE_PADDING: f32 = 10.0;

/// Spiral rings stop strictly below this radius.
pub const SPIRAL_RADIUS_LIMIT: f32 = 200.0;

/// Angles probed on each spiral ring.
const SPIRAL_ANGLES_DEGREES: [f32; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

/// Find the nearest available position for a `size` rectangle.
///
/// Tries a spiral around `preferred` first, then a row-major grid scan of the
/// whole panel interior. Returns `None` when neither pass finds a slot; the
/// caller must then reject the mutation or keep prior geometry.
#[must_use]
pub fn find_free_space(
    preferred: Point,
    size: Size,
    occupied: &[Rect],
    panel: &Panel,
) -> Option<Point> {
    let x_range = search_range(size.width, panel.width)?;
    let y_range = search_range(size.height, panel.height)?;
    spiral_search(preferred, size, occupied, x_range, y_range)
        .or_else(|| grid_search(size, occupied, x_range, y_range))
}

/// Origins searched along one axis.
///
/// The padded interior when the extent fits inside it, otherwise the whole
/// panel. `None` when the extent is larger than the panel.
fn search_range(extent: f32, panel_extent: f32) -> Option<(f32, f32)> {
    let padded_max = panel_extent - extent - EDGE_PADDING;
    if padded_max >= EDGE_PADDING {
        Some((EDGE_PADDING, padded_max))
    } else if extent <= panel_extent {
        Some((0.0, panel_extent - extent))
    } else {
        None
    }
}

fn is_free(origin: Point, size: Size, occupied: &[Rect]) -> bool {
    !collides_with_any(&Rect::from_parts(origin, size), occupied)
}

fn spiral_search(
    preferred: Point,
    size: Size,
    occupied: &[Rect],
    (min_x, max_x): (f32, f32),
    (min_y, max_y): (f32, f32),
) -> Option<Point> {
    let rings = (0_u16..=u16::MAX)
        .map(|ring| f32::from(ring) * GRID_STEP)
        .take_while(|radius| *radius < SPIRAL_RADIUS_LIMIT);

    for radius in rings {
        for angle in SPIRAL_ANGLES_DEGREES {
            let (sin, cos) = angle.to_radians().sin_cos();
            let candidate = Point::new(
                clamp_axis(preferred.x + radius * cos, min_x, max_x),
                clamp_axis(preferred.y + radius * sin, min_y, max_y),
            );
            if is_free(candidate, size, occupied) {
                return Some(candidate);
            }
        }
    }
    None
}

fn grid_search(
    size: Size,
    occupied: &[Rect],
    (min_x, max_x): (f32, f32),
    (min_y, max_y): (f32, f32),
) -> Option<Point> {
    let steps = |min: f32, max: f32| {
        (0_u16..=u16::MAX)
            .map(move |i| min + f32::from(i) * GRID_STEP)
            .take_while(move |v| *v <= max)
    };

    for y in steps(min_y, max_y) {
        for x in steps(min_x, max_x) {
            let candidate = Point::new(x, y);
            if is_free(candidate, size, occupied) {
                return Some(candidate);
            }
        }
    }
    tracing::debug!(
        width = size.width,
        height = size.height,
        occupied = occupied.len(),
        "No free space found on panel"
    );
    None
}
