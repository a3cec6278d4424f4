use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ThemeError, ThemeResult};

/// Display outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasShape {
    /// Rectangular panel.
    #[default]
    Rect,
    /// Round panel of diameter `2 * radius`.
    Circle,
}

/// Persisted theme: canvas metadata plus the serialized scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    /// Display outline.
    #[serde(default)]
    pub shape: CanvasShape,
    /// Rect width.
    #[serde(default)]
    pub width: f64,
    /// Rect height.
    #[serde(default)]
    pub height: f64,
    /// Circle radius.
    #[serde(default)]
    pub radius: f64,
    /// Serialized scene.
    #[serde(rename = "canvasJSON", default, skip_serializing_if = "Option::is_none")]
    pub canvas_json: Option<CanvasJson>,
    /// Font family -> font bytes (hex, base64 or data URL).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fonts: BTreeMap<String, String>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SceneDocument {
    /// Parse document JSON text.
    pub fn from_json_str(s: &str) -> ThemeResult<Self> {
        serde_json::from_str(s).map_err(|e| ThemeError::serde(format!("scene document: {e}")))
    }

    /// Serialize back to JSON text.
    pub fn to_json_string(&self) -> ThemeResult<String> {
        serde_json::to_string(self).map_err(|e| ThemeError::serde(e.to_string()))
    }
}

/// Serialized scene body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasJson {
    /// Primitives in paint order.
    #[serde(default)]
    pub objects: Vec<PrimitiveDoc>,
    /// Background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<serde_json::Value>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One serialized visual primitive.
///
/// Styling fields accept arbitrary JSON since editors store gradients and patterns in the same
/// slots as plain colors; anything but a color string falls back to the default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveDoc {
    /// Primitive tag (`rect`, `circle`, `text`, `i-text`, `textbox`, `image`, `group`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Editor name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Origin x position.
    #[serde(default)]
    pub left: f64,
    /// Origin y position.
    #[serde(default)]
    pub top: f64,
    /// Unscaled width.
    #[serde(default)]
    pub width: f64,
    /// Unscaled height.
    #[serde(default)]
    pub height: f64,
    /// Horizontal scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    /// Vertical scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    /// Rotation in degrees.
    #[serde(default)]
    pub angle: f64,
    /// `left` | `center` | `right`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_x: Option<serde_json::Value>,
    /// `top` | `center` | `bottom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_y: Option<serde_json::Value>,
    /// Opacity in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Hidden primitives are kept but not painted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Fill color.
    #[serde(
        default,
        deserialize_with = "null_as_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub fill: Option<serde_json::Value>,
    /// Stroke color.
    #[serde(
        default,
        deserialize_with = "null_as_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke: Option<serde_json::Value>,
    /// Stroke width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Stroke dash pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dash_array: Option<Vec<f64>>,
    /// Rect corner radius x.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx: Option<f64>,
    /// Rect corner radius y.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ry: Option<f64>,
    /// Circle radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Arc start (degrees).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_angle: Option<f64>,
    /// Arc end (degrees).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_angle: Option<f64>,
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// `left` | `center` | `right` | `justify`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    /// Text box background.
    #[serde(
        default,
        deserialize_with = "null_as_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_color: Option<serde_json::Value>,
    /// Image source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Group children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<PrimitiveDoc>>,
    /// Bound item payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing field is `None`.
fn null_as_value<'de, D>(de: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(de).map(Some)
}

impl PrimitiveDoc {
    /// String form of a styling value, when it is one.
    pub fn color_str(v: &Option<serde_json::Value>) -> Option<&str> {
        v.as_ref().and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
