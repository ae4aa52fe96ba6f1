//! Panel elements - the text and icon objects a layout is made of.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Rect, Size};

/// Default size of a new text element.
pub const DEFAULT_TEXT_SIZE: Size = Size::new(120.0, 40.0);

/// Default size of a new icon element.
pub const DEFAULT_ICON_SIZE: Size = Size::new(64.0, 64.0);

/// Size substituted for malformed or non-positive geometry.
pub const FALLBACK_SIZE: Size = Size::new(100.0, 100.0);

/// Rotation bounds in degrees.
pub const MAX_ROTATION_DEGREES: f32 = 180.0;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font style for text elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright text.
    #[default]
    Normal,
    /// Italic text.
    Italic,
}

/// Horizontal alignment of text inside its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    Left,
    /// Center the text.
    #[default]
    Center,
    /// Align to the right edge.
    Right,
}

/// The type of content an element carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ElementKind {
    /// A text label.
    Text {
        /// Text content.
        content: String,
        /// Font family name.
        font_family: String,
        /// Numeric font weight (100-900).
        font_weight: u16,
        /// Upright or italic.
        font_style: FontStyle,
        /// Horizontal alignment.
        align: TextAlign,
    },

    /// An icon from the icon set.
    Icon {
        /// Icon identifier.
        icon: String,
    },
}

impl ElementKind {
    /// Text content with the default font settings.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            font_family: "Inter".to_string(),
            font_weight: 400,
            font_style: FontStyle::Normal,
            align: TextAlign::Center,
        }
    }

    /// Icon content.
    #[must_use]
    pub fn icon(icon: impl Into<String>) -> Self {
        Self::Icon { icon: icon.into() }
    }

    /// Size given to newly created elements of this kind.
    #[must_use]
    pub const fn default_size(&self) -> Size {
        match self {
            Self::Text { .. } => DEFAULT_TEXT_SIZE,
            Self::Icon { .. } => DEFAULT_ICON_SIZE,
        }
    }
}

/// A panel element with content and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier, stable for the element's lifetime.
    pub id: ElementId,
    /// Element content.
    pub kind: ElementKind,
    /// Position and size. Collision always uses this unrotated box.
    pub geometry: Rect,
    /// Rotation in degrees, presentational only.
    #[serde(default)]
    pub rotation: f32,
    /// One-shot request to enter edit mode right after creation.
    #[serde(skip)]
    pub auto_edit: bool,
}

impl Element {
    /// Create a new element at the origin with its kind's default size.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        let geometry = Rect::from_parts(Point::new(0.0, 0.0), kind.default_size());
        Self {
            id: ElementId::new(),
            kind,
            geometry,
            rotation: 0.0,
            auto_edit: false,
        }
    }

    /// Create a text element with default font settings.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ElementKind::text(content))
    }

    /// Create an icon element.
    #[must_use]
    pub fn icon(icon: impl Into<String>) -> Self {
        Self::new(ElementKind::icon(icon))
    }

    /// Set the geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: Rect) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the rotation, clamped into [-180, 180] degrees.
    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = normalize_rotation(degrees);
        self
    }

    /// Copy this element under a fresh id.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: ElementId::new(),
            auto_edit: false,
            ..self.clone()
        }
    }
}

/// Clamp a rotation into [-180, 180] degrees; non-finite input becomes zero.
#[must_use]
pub fn normalize_rotation(degrees: f32) -> f32 {
    if degrees.is_finite() {
        degrees.clamp(-MAX_ROTATION_DEGREES, MAX_ROTATION_DEGREES)
    } else {
        0.0
    }
}

/// Replace malformed geometry before it reaches collision logic.
///
/// Non-finite or non-positive sizes fall back to [`FALLBACK_SIZE`] per axis;
/// non-finite coordinates fall back to zero.
#[must_use]
pub fn sanitize_geometry(rect: Rect) -> Rect {
    let usable = |v: f32| v.is_finite() && v > 0.0;
    let width = if usable(rect.width) {
        rect.width
    } else {
        FALLBACK_SIZE.width
    };
    let height = if usable(rect.height) {
        rect.height
    } else {
        FALLBACK_SIZE.height
    };
    let x = if rect.x.is_finite() { rect.x } else { 0.0 };
    let y = if rect.y.is_finite() { rect.y } else { 0.0 };
    Rect::new(x, y, width, height)
}
