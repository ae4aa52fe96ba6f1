//! Collision prevention.
//!
//! Validates proposed moves and resizes against every other element and
//! falls back to free-space search when a proposal is invalid. All checks
//! read an immutable snapshot; nothing here mutates its input.

use crate::free_space::find_free_space;
use crate::geometry::{clamp_axis, collides_with_any, Point, Rect, Size};
use crate::{Element, ElementId, Panel};

/// Smallest dimension the resize fallback will shrink to.
pub const MIN_RESIZE_DIMENSION: f32 = 20.0;

/// Shrink steps tried by [`CollisionService::get_safe_resize`], in tenths.
const RESIZE_SCALE_TENTHS: [u8; 6] = [9, 8, 7, 6, 5, 4];

/// Collision checks over one snapshot of the element list.
#[derive(Debug, Clone, Copy)]
pub struct CollisionService<'a> {
    elements: &'a [Element],
    panel: Panel,
}

impl<'a> CollisionService<'a> {
    /// Create a service over an element snapshot.
    #[must_use]
    pub fn new(elements: &'a [Element], panel: Panel) -> Self {
        Self { elements, panel }
    }

    fn find(&self, id: ElementId) -> Option<&'a Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Geometry of every element except `id`.
    fn others(&self, id: Option<ElementId>) -> Vec<Rect> {
        self.elements
            .iter()
            .filter(|e| Some(e.id) != id)
            .map(|e| e.geometry)
            .collect()
    }

    /// Validate a move of `id` to `preferred`.
    ///
    /// Returns `preferred` unchanged when it clears every other element,
    /// otherwise the nearest free slot. `None` means the element is unknown
    /// or no slot exists.
    #[must_use]
    pub fn get_safe_position(
        &self,
        id: ElementId,
        preferred: Point,
        size: Option<Size>,
    ) -> Option<Point> {
        let element = self.find(id)?;
        let size = size.unwrap_or_else(|| element.geometry.size());
        self.safe_position_among(&self.others(Some(id)), preferred, size)
    }

    /// Validate placement of an element that is not yet in the snapshot.
    #[must_use]
    pub fn place_new(&self, candidate: Rect) -> Option<Point> {
        self.safe_position_among(&self.others(None), candidate.origin(), candidate.size())
    }

    fn safe_position_among(&self, others: &[Rect], preferred: Point, size: Size) -> Option<Point> {
        if collides_with_any(&Rect::from_parts(preferred, size), others) {
            let found = find_free_space(preferred, size, others, &self.panel);
            tracing::debug!(?preferred, ?found, "Relocated colliding position");
            found
        } else {
            Some(preferred)
        }
    }

    /// Fit a resize proposal inside the panel.
    ///
    /// The origin keeps at least [`MIN_RESIZE_DIMENSION`] of room on each
    /// axis and the size is capped at the room left past the origin.
    fn fit_into_panel(&self, origin: Point, size: Size) -> Rect {
        let x = clamp_axis(origin.x, 0.0, self.panel.width - MIN_RESIZE_DIMENSION);
        let y = clamp_axis(origin.y, 0.0, self.panel.height - MIN_RESIZE_DIMENSION);
        Rect::new(
            x,
            y,
            size.width.min(self.panel.width - x),
            size.height.min(self.panel.height - y),
        )
    }

    /// Validate a resize of `id` to `new_size`, optionally at a new origin.
    ///
    /// The proposal is first fitted inside the panel. A colliding size is shrunk in 10% steps (90% down to 40%), each
    /// dimension floored at [`MIN_RESIZE_DIMENSION`]. If no step clears, the
    /// element's current geometry is returned, rejecting the resize. `None`
    /// only when the element is unknown.
    #[must_use]
    pub fn get_safe_resize(
        &self,
        id: ElementId,
        new_size: Size,
        origin: Option<Point>,
    ) -> Option<Rect> {
        let element = self.find(id)?;
        let origin = origin.unwrap_or_else(|| element.geometry.origin());
        let others = self.others(Some(id));

        let proposed = self.fit_into_panel(origin, new_size);
        if !collides_with_any(&proposed, &others) {
            return Some(proposed);
        }

        for tenths in RESIZE_SCALE_TENTHS {
            let scale = f32::from(tenths) / 10.0;
            let scaled = self.fit_into_panel(
                origin,
                Size::new(
                    (new_size.width * scale).max(MIN_RESIZE_DIMENSION),
                    (new_size.height * scale).max(MIN_RESIZE_DIMENSION),
                ),
            );
            if !collides_with_any(&scaled, &others) {
                tracing::debug!(%id, scale, "Resize shrunk to clear collision");
                return Some(scaled);
            }
        }

        tracing::debug!(%id, "Resize rejected, keeping original geometry");
        Some(element.geometry)
    }
}

/// Correct overlaps across a whole element list.
///
/// Elements are accepted in input order and each one is only tested against
/// those accepted before it, so earlier elements keep their place. An
/// element with no free slot is kept where it is rather than dropped. A list
/// that already satisfies the collision invariant comes back unchanged.
#[must_use]
pub fn validate_and_correct_positions(elements: &[Element], panel: &Panel) -> Vec<Element> {
    let mut accepted: Vec<Element> = Vec::with_capacity(elements.len());

    for element in elements {
        let occupied: Vec<Rect> = accepted.iter().map(|e| e.geometry).collect();
        if !collides_with_any(&element.geometry, &occupied) {
            accepted.push(element.clone());
            continue;
        }

        match find_free_space(
            element.geometry.origin(),
            element.geometry.size(),
            &occupied,
            panel,
        ) {
            Some(origin) => {
                tracing::debug!(id = %element.id, ?origin, "Moved overlapping element");
                let mut moved = element.clone();
                moved.geometry = moved.geometry.moved_to(origin);
                accepted.push(moved);
            }
            None => {
                tracing::warn!(
                    id = %element.id,
                    "No free space for overlapping element, keeping original position"
                );
                accepted.push(element.clone());
            }
        }
    }

    accepted
}
