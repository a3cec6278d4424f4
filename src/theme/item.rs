use serde::{Deserialize, Serialize};

/// Pseudo-sensor whose values are computed locally (date, time, custom text).
pub const FRONTEND_SENSOR: &str = "frontend";
/// Pseudo-sensor fed by the weather backend; always re-applied on every tick.
pub const WEATHER_SENSOR: &str = "weather";
/// Localized placeholder stored by the editor for weather text previews.
pub const WEATHER_PLACEHOLDER: &str = "WatherFakeValue";

/// Widget kind selecting a node's render/update behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShowType {
    /// Formatted text.
    Text,
    /// Horizontal progress bar (background + foreground rect).
    BarChart,
    /// Segmented ring (background + foreground arc).
    DonutChart,
    /// Static or animated image.
    Image,
}

impl ShowType {
    /// Parse the document tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Text" => Some(Self::Text),
            "BarChart" => Some(Self::BarChart),
            "DonutChart" => Some(Self::DonutChart),
            "Image" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Media reference stored on image nodes created from uploaded files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    /// MIME type marker, e.g. `image/gif`.
    #[serde(rename = "type")]
    pub mime: String,
    /// Original source (data URL, path or URL).
    pub src: String,
}

impl MediaRef {
    /// True for formats that must be rebuilt as sprite animations.
    pub fn is_animated(&self) -> bool {
        matches!(
            self.mime.to_ascii_lowercase().as_str(),
            "image/gif" | "image/webp" | "image/apng"
        )
    }
}

/// A telemetry or stored value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemValue {
    /// Numeric reading.
    Number(f64),
    /// String reading (text, icon code, image source).
    Text(String),
    /// Uploaded media marker.
    Media(MediaRef),
    /// Anything else the editor stored.
    Other(serde_json::Value),
}

impl ItemValue {
    /// Convert from a JSON value, mapping `null` to `None`.
    pub fn from_json(v: &serde_json::Value) -> Option<Self> {
        if v.is_null() {
            return None;
        }
        serde_json::from_value(v.clone()).ok()
    }

    /// Numeric view; numeric strings are accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Other(serde_json::Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// String view used for text output and image sources.
    pub fn to_display(&self) -> String {
        match self {
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
            Self::Media(m) => m.src.clone(),
            Self::Other(serde_json::Value::String(s)) => s.clone(),
            Self::Other(v) => v.to_string(),
        }
    }
}

impl From<&str> for ItemValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for ItemValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for ItemValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Shortest decimal rendering; integral values print without a fraction.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Metadata attached to a data-bound node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeItem {
    /// Sensor id, or a pseudo-sensor (`frontend`, `weather`).
    #[serde(default)]
    pub sensor: String,
    /// Localization key for the sensor name.
    #[serde(default)]
    pub sensor_label: String,
    /// Attribute id within the sensor.
    #[serde(default)]
    pub attribute: String,
    /// Localization key for the attribute name.
    #[serde(default)]
    pub attribute_label: String,
    /// Widget kind.
    pub show_type: ShowType,
    /// Display unit (`kb/s`, `mb/s`, `%`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Append `" <unit>"` to text output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_unit: Option<bool>,
    /// Date format for `frontend/date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    /// Time format for `frontend/time`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    /// Donut dash length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_width: Option<f64>,
    /// Donut gap length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_gap: Option<f64>,
    /// Value stored by the editor or last applied by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ItemValue>,
    /// Editor-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Fields the engine does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ThemeItem {
    /// Minimal item for a sensor attribute.
    pub fn new(sensor: &str, attribute: &str, show_type: ShowType) -> Self {
        Self {
            sensor: sensor.to_owned(),
            sensor_label: String::new(),
            attribute: attribute.to_owned(),
            attribute_label: String::new(),
            show_type,
            unit: None,
            show_unit: None,
            date_format: None,
            time_format: None,
            segment_width: None,
            segment_gap: None,
            value: None,
            uuid: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Locally computed values.
    pub fn is_frontend(&self) -> bool {
        self.sensor == FRONTEND_SENSOR
    }

    /// Weather pseudo-sensor.
    pub fn is_weather(&self) -> bool {
        self.sensor == WEATHER_SENSOR
    }

    /// Weather icon nodes map their code through the icon table.
    pub fn is_weather_icon(&self) -> bool {
        self.is_weather() && self.attribute == "icon"
    }

    /// Weather text nodes get placeholder substitution.
    pub fn is_weather_text(&self) -> bool {
        self.is_weather() && self.attribute == "text"
    }

    /// Animated media marker, if the stored value carries one.
    pub fn animated_media(&self) -> Option<&MediaRef> {
        match &self.value {
            Some(ItemValue::Media(m)) if m.is_animated() => Some(m),
            _ => None,
        }
    }

    /// True when the item references a sensor at all.
    pub fn is_bound(&self) -> bool {
        !self.sensor.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/item.rs"]
mod tests;
