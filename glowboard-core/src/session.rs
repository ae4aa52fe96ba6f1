//! Drag and resize sessions.
//!
//! A session runs from a start event through any number of frames to an
//! end event. Frames only update the session's transient geometry; the
//! committed element list is untouched until the owner commits the result
//! at session end. An abandoned session therefore leaves the last
//! committed state intact.

use serde::{Deserialize, Serialize};

use crate::collision::CollisionService;
use crate::geometry::{Point, Rect, Size};
use crate::snap::{snap, Guide};
use crate::{Element, ElementId, Panel};

/// Result of one interactive frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameUpdate {
    /// Element being manipulated.
    pub element_id: ElementId,
    /// Geometry to display for this frame.
    pub geometry: Rect,
    /// Guides to render for this frame. Always empty for resizes.
    pub guides: Vec<Guide>,
}

/// An in-flight drag of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    element_id: ElementId,
    origin: Rect,
    current: Rect,
    guides: Vec<Guide>,
}

impl DragSession {
    /// Start dragging `id`. Returns `None` if the element is not in the list.
    #[must_use]
    pub fn start(elements: &[Element], id: ElementId) -> Option<Self> {
        let element = elements.iter().find(|e| e.id == id)?;
        Some(Self {
            element_id: id,
            origin: element.geometry,
            current: element.geometry,
            guides: Vec::new(),
        })
    }

    /// Element being dragged.
    #[must_use]
    pub const fn element_id(&self) -> ElementId {
        self.element_id
    }

    /// Geometry to display for the dragged element.
    #[must_use]
    pub const fn current(&self) -> Rect {
        self.current
    }

    /// Guides from the most recent frame.
    #[must_use]
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    /// Process one pointer frame proposing a new top-left position.
    ///
    /// The proposal is clamped into the panel, snapped, clamped again and
    /// validated. When validation finds no slot the element shows at its
    /// last committed position. A non-finite pointer leaves the frame as it
    /// was. Returns `None` once the element has been removed from `elements`.
    pub fn frame(
        &mut self,
        elements: &[Element],
        panel: &Panel,
        proposed: Point,
    ) -> Option<FrameUpdate> {
        let element = elements.iter().find(|e| e.id == self.element_id)?;
        if !(proposed.x.is_finite() && proposed.y.is_finite()) {
            return Some(self.update());
        }
        let clamped = element.geometry.moved_to(proposed).clamp_into(panel);

        let snapped = snap(element, clamped.x, clamped.y, elements, panel);
        let snapped_rect = clamped
            .moved_to(Point::new(snapped.x, snapped.y))
            .clamp_into(panel);

        let service = CollisionService::new(elements, *panel);
        match service.get_safe_position(self.element_id, snapped_rect.origin(), None) {
            Some(origin) => {
                self.current = snapped_rect.moved_to(origin);
                self.guides = snapped.guides;
            }
            None => {
                tracing::debug!(id = %self.element_id, "No safe drag position, reverting frame");
                self.current = element.geometry;
                self.guides.clear();
            }
        }

        Some(self.update())
    }

    fn update(&self) -> FrameUpdate {
        FrameUpdate {
            element_id: self.element_id,
            geometry: self.current,
            guides: self.guides.clone(),
        }
    }

    /// Final geometry to commit, or `None` if the element never moved.
    #[must_use]
    pub fn finish(self) -> Option<(ElementId, Rect)> {
        (self.current != self.origin).then_some((self.element_id, self.current))
    }
}

/// An in-flight resize of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    element_id: ElementId,
    origin: Rect,
    current: Rect,
}

impl ResizeSession {
    /// Start resizing `id`. Returns `None` if the element is not in the list.
    #[must_use]
    pub fn start(elements: &[Element], id: ElementId) -> Option<Self> {
        let element = elements.iter().find(|e| e.id == id)?;
        Some(Self {
            element_id: id,
            origin: element.geometry,
            current: element.geometry,
        })
    }

    /// Element being resized.
    #[must_use]
    pub const fn element_id(&self) -> ElementId {
        self.element_id
    }

    /// Geometry to display for the resized element.
    #[must_use]
    pub const fn current(&self) -> Rect {
        self.current
    }

    /// Process one frame proposing a raw size and optionally a new origin.
    ///
    /// No snapping: the raw proposal goes straight to collision clamping.
    /// Unusable dimensions keep the current value on that axis.
    pub fn frame(
        &mut self,
        elements: &[Element],
        panel: &Panel,
        proposed: Size,
        origin: Option<Point>,
    ) -> Option<FrameUpdate> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        let size = Size::new(
            if usable(proposed.width) {
                proposed.width
            } else {
                self.current.width
            },
            if usable(proposed.height) {
                proposed.height
            } else {
                self.current.height
            },
        );
        let origin = origin.filter(|p| p.x.is_finite() && p.y.is_finite());

        let service = CollisionService::new(elements, *panel);
        self.current = service.get_safe_resize(self.element_id, size, origin)?;

        Some(FrameUpdate {
            element_id: self.element_id,
            geometry: self.current,
            guides: Vec::new(),
        })
    }

    /// Final geometry to commit, or `None` if nothing changed.
    #[must_use]
    pub fn finish(self) -> Option<(ElementId, Rect)> {
        (self.current != self.origin).then_some((self.element_id, self.current))
    }
}
