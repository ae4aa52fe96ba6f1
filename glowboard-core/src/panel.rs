//! Panel bounds - the fixed-aspect canvas every element lives on.

use serde::{Deserialize, Serialize};

use crate::{PanelError, PanelResult, Size};

/// Default panel width in pixels.
pub const DEFAULT_PANEL_WIDTH: f32 = 800.0;

/// Default panel height in pixels.
pub const DEFAULT_PANEL_HEIGHT: f32 = 400.0;

/// Viewports narrower than this get a panel derived from their width.
pub const SMALL_VIEWPORT_BREAKPOINT: f32 = 840.0;

/// Horizontal margin kept around a panel on small viewports.
const SMALL_VIEWPORT_MARGIN: f32 = 40.0;

/// Panel width divided by panel height.
const PANEL_ASPECT_RATIO: f32 = DEFAULT_PANEL_WIDTH / DEFAULT_PANEL_HEIGHT;

/// Panel dimensions, fixed for an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Panel {
    /// Create a panel, rejecting non-finite or non-positive dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidPanel`] if either dimension is unusable.
    pub fn new(width: f32, height: f32) -> PanelResult<Self> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if usable(width) && usable(height) {
            Ok(Self { width, height })
        } else {
            Err(PanelError::InvalidPanel { width, height })
        }
    }

    /// Whether a rectangle of `size` can lie anywhere on the panel.
    #[must_use]
    pub fn fits(&self, size: Size) -> bool {
        size.width <= self.width && size.height <= self.height
    }

    /// Derive the panel for a viewport.
    ///
    /// Small viewports get a panel that fills their width (minus a margin)
    /// at the fixed aspect ratio; larger ones get the constant default.
    #[must_use]
    pub fn for_viewport(viewport_width: f32) -> Self {
        if viewport_width.is_finite() && viewport_width < SMALL_VIEWPORT_BREAKPOINT {
            let width = (viewport_width - SMALL_VIEWPORT_MARGIN).max(PANEL_ASPECT_RATIO);
            Self {
                width,
                height: width / PANEL_ASPECT_RATIO,
            }
        } else {
            Self::default()
        }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            width: DEFAULT_PANEL_WIDTH,
            height: DEFAULT_PANEL_HEIGHT,
        }
    }
}
