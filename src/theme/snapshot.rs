use std::collections::HashMap;

use crate::{
    foundation::error::{ThemeError, ThemeResult},
    theme::item::ItemValue,
};

/// Point-in-time telemetry: sensor id -> attribute id -> value.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SensorSnapshot {
    sensors: HashMap<String, HashMap<String, serde_json::Value>>,
}

impl SensorSnapshot {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from JSON text.
    ///
    /// Non-object sensor entries (e.g. the backend's `beauty` helper scalars) are ignored.
    pub fn from_json_str(s: &str) -> ThemeResult<Self> {
        let raw: serde_json::Value =
            serde_json::from_str(s).map_err(|e| ThemeError::serde(e.to_string()))?;
        Self::from_json(&raw)
    }

    /// Build from an already parsed JSON value.
    pub fn from_json(raw: &serde_json::Value) -> ThemeResult<Self> {
        let obj = raw
            .as_object()
            .ok_or_else(|| ThemeError::serde("sensor snapshot must be a JSON object"))?;
        let mut sensors = HashMap::with_capacity(obj.len());
        for (sensor, attrs) in obj {
            let Some(attrs) = attrs.as_object() else {
                continue;
            };
            let attrs = attrs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<HashMap<_, _>>();
            sensors.insert(sensor.clone(), attrs);
        }
        Ok(Self { sensors })
    }

    /// Insert or replace one reading.
    pub fn set(&mut self, sensor: &str, attribute: &str, value: impl Into<serde_json::Value>) {
        self.sensors
            .entry(sensor.to_owned())
            .or_default()
            .insert(attribute.to_owned(), value.into());
    }

    /// Builder form of [`SensorSnapshot::set`].
    pub fn with(mut self, sensor: &str, attribute: &str, value: impl Into<serde_json::Value>) -> Self {
        self.set(sensor, attribute, value);
        self
    }

    /// Reading for `sensor/attribute`; missing and `null` readings are `None`.
    pub fn get(&self, sensor: &str, attribute: &str) -> Option<ItemValue> {
        self.sensors
            .get(sensor)
            .and_then(|attrs| attrs.get(attribute))
            .and_then(ItemValue::from_json)
    }

    /// Sensor ids present in the snapshot.
    pub fn sensors(&self) -> impl Iterator<Item = &str> {
        self.sensors.keys().map(String::as_str)
    }

    /// True when no sensor is present.
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/snapshot.rs"]
mod tests;
