//! Layout document format for saving and loading panels.
//!
//! Documents are lenient on geometry: each coordinate may be a number, a
//! numeric string, or missing. Anything unusable is sanitized when the
//! document is turned into elements, so malformed input never reaches the
//! collision logic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::{normalize_rotation, sanitize_geometry};
use crate::geometry::Rect;
use crate::{Element, ElementId, ElementKind, Panel, PanelError, PanelResult};

/// Read a document coordinate, yielding NaN for anything non-numeric.
#[allow(clippy::cast_possible_truncation)]
fn coordinate(value: &Value) -> f32 {
    match value {
        Value::Number(n) => n.as_f64().map_or(f32::NAN, |v| v as f32),
        Value::String(s) => s.trim().parse().unwrap_or(f32::NAN),
        _ => f32::NAN,
    }
}

/// Document-friendly geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryDocument {
    /// Left edge.
    #[serde(default)]
    pub x: Value,
    /// Top edge.
    #[serde(default)]
    pub y: Value,
    /// Width.
    #[serde(default)]
    pub width: Value,
    /// Height.
    #[serde(default)]
    pub height: Value,
}

impl GeometryDocument {
    /// Sanitized rectangle for this geometry.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        sanitize_geometry(Rect::new(
            coordinate(&self.x),
            coordinate(&self.y),
            coordinate(&self.width),
            coordinate(&self.height),
        ))
    }
}

impl From<Rect> for GeometryDocument {
    fn from(rect: Rect) -> Self {
        Self {
            x: Value::from(f64::from(rect.x)),
            y: Value::from(f64::from(rect.y)),
            width: Value::from(f64::from(rect.width)),
            height: Value::from(f64::from(rect.height)),
        }
    }
}

/// Document-friendly element description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDocument {
    /// Element identifier. A fresh one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Element content.
    pub kind: ElementKind,
    /// Position and size.
    #[serde(default)]
    pub geometry: GeometryDocument,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: Value,
}

impl From<&Element> for ElementDocument {
    fn from(element: &Element) -> Self {
        Self {
            id: Some(element.id.to_string()),
            kind: element.kind.clone(),
            geometry: GeometryDocument::from(element.geometry),
            rotation: Value::from(f64::from(element.rotation)),
        }
    }
}

impl ElementDocument {
    /// Convert document to runtime element.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidElementId`] if the id is not a valid UUID.
    pub fn into_element(mut self) -> PanelResult<Element> {
        let id = match self.id.take() {
            Some(raw) => ElementId::parse(&raw).map_err(|_| PanelError::InvalidElementId(raw))?,
            None => ElementId::new(),
        };
        let mut element = self.into_clipboard_element();
        element.id = id;
        Ok(element)
    }

    /// Convert a clipboard payload entry, ignoring its id.
    ///
    /// Pasted elements always receive fresh ids, so an unreadable id in a
    /// payload is not an error.
    #[must_use]
    pub fn into_clipboard_element(self) -> Element {
        let geometry = self.geometry.to_rect();
        let mut element = Element::new(self.kind).with_geometry(geometry);
        element.rotation = normalize_rotation(coordinate(&self.rotation));
        element
    }
}

/// Saved panel layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Panel dimensions.
    pub panel: Panel,
    /// Elements in draw order.
    pub elements: Vec<ElementDocument>,
}

impl LayoutDocument {
    /// Build a document from a panel and its elements.
    #[must_use]
    pub fn from_parts(panel: &Panel, elements: &[Element]) -> Self {
        Self {
            panel: *panel,
            elements: elements.iter().map(ElementDocument::from).collect(),
        }
    }

    /// Parse a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Serialization`] on malformed JSON.
    pub fn from_json(json: &str) -> PanelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> PanelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the panel and materialize every element.
    ///
    /// Elements are not collision-corrected here; that is the editor's job
    /// on load.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidPanel`] for unusable panel dimensions and
    /// [`PanelError::InvalidElementId`] for an unreadable element id.
    pub fn into_parts(self) -> PanelResult<(Panel, Vec<Element>)> {
        let panel = Panel::new(self.panel.width, self.panel.height)?;
        let elements = self
            .elements
            .into_iter()
            .map(ElementDocument::into_element)
            .collect::<PanelResult<Vec<_>>>()?;
        Ok((panel, elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FALLBACK_SIZE;

    #[test]
    fn test_document_roundtrip() {
        let panel = Panel::default();
        let elements = vec![
            Element::text("Open").with_geometry(Rect::new(10.0, 10.0, 120.0, 40.0)),
            Element::icon("bolt")
                .with_geometry(Rect::new(200.0, 50.0, 64.0, 64.0))
                .with_rotation(30.0),
        ];

        let json = LayoutDocument::from_parts(&panel, &elements)
            .to_json()
            .expect("serialize");
        let (loaded_panel, loaded) = LayoutDocument::from_json(&json)
            .expect("parse")
            .into_parts()
            .expect("valid document");

        assert_eq!(loaded_panel, panel);
        assert_eq!(loaded, elements);
    }

    #[test]
    fn test_element_keeps_document_id() {
        let element = Element::icon("bolt").with_geometry(Rect::new(30.0, 40.0, 64.0, 64.0));
        let restored = ElementDocument::from(&element)
            .into_element()
            .expect("valid id");
        assert_eq!(restored.id, element.id);
        assert_eq!(restored.geometry, element.geometry);
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let json = r#"{
            "panel": {"width": 800, "height": 400},
            "elements": [{
                "kind": {"type": "Icon", "data": {"icon": "star"}},
                "geometry": {"x": "15", "y": 20, "width": "64", "height": 64.0}
            }]
        }"#;
        let (_, elements) = LayoutDocument::from_json(json)
            .expect("parse")
            .into_parts()
            .expect("valid document");
        assert_eq!(elements[0].geometry, Rect::new(15.0, 20.0, 64.0, 64.0));
    }

    #[test]
    fn test_malformed_geometry_sanitized() {
        let json = r#"{
            "panel": {"width": 800, "height": 400},
            "elements": [{
                "kind": {"type": "Icon", "data": {"icon": "star"}},
                "geometry": {"x": 5, "y": null, "width": "wide", "height": -4},
                "rotation": "spin"
            }]
        }"#;
        let (_, elements) = LayoutDocument::from_json(json)
            .expect("parse")
            .into_parts()
            .expect("valid document");
        let element = &elements[0];
        assert_eq!(element.geometry.size(), FALLBACK_SIZE);
        assert!((element.geometry.x - 5.0).abs() < f32::EPSILON);
        assert!(element.geometry.y.abs() < f32::EPSILON);
        assert!(element.rotation.abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_id_rejected() {
        let json = r#"{
            "panel": {"width": 800, "height": 400},
            "elements": [{"id": "1700000000000", "kind": {"type": "Icon", "data": {"icon": "x"}}}]
        }"#;
        let result = LayoutDocument::from_json(json).expect("parse").into_parts();
        assert!(matches!(result, Err(PanelError::InvalidElementId(id)) if id == "1700000000000"));
    }

    #[test]
    fn test_clipboard_element_ignores_id() {
        let doc = ElementDocument {
            id: Some("not-a-uuid".to_string()),
            kind: ElementKind::icon("x"),
            geometry: GeometryDocument::default(),
            rotation: Value::Null,
        };
        let element = doc.into_clipboard_element();
        assert_eq!(element.geometry.size(), FALLBACK_SIZE);
        assert!(element.geometry.x.abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_panel_rejected() {
        let json = r#"{"panel": {"width": 0, "height": 400}, "elements": []}"#;
        let result = LayoutDocument::from_json(json).expect("parse").into_parts();
        assert!(matches!(result, Err(PanelError::InvalidPanel { .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            LayoutDocument::from_json("{ not json"),
            Err(PanelError::Serialization(_))
        ));
    }
}
