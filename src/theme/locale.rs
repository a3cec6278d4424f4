use std::collections::HashMap;

use crate::foundation::error::{ThemeError, ThemeResult};

/// Localization capability injected into the player.
pub trait Translate: Send + Sync {
    /// Translate a dotted key such as `label.CPU`; unknown keys return the key itself.
    fn translate(&self, key: &str) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn translate(&self, key: &str) -> String {
        self(key)
    }
}

/// Translator that echoes the last key segment (`label.CPU` -> `CPU`).
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyEcho;

impl Translate for KeyEcho {
    fn translate(&self, key: &str) -> String {
        key.rsplit('.').next().unwrap_or(key).to_owned()
    }
}

/// Flat message table loaded from nested JSON (`{"label": {"CPU": "CPU"}}`).
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a nested JSON object into dotted keys.
    pub fn from_json_str(s: &str) -> ThemeResult<Self> {
        let v: serde_json::Value =
            serde_json::from_str(s).map_err(|e| ThemeError::serde(e.to_string()))?;
        if !v.is_object() {
            return Err(ThemeError::serde("message catalog must be a JSON object"));
        }
        let mut out = Self::new();
        flatten_into(&mut out.messages, String::new(), &v);
        Ok(out)
    }

    /// Insert or replace a message.
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn flatten_into(out: &mut HashMap<String, String>, prefix: String, v: &serde_json::Value) {
    match v {
        serde_json::Value::Object(map) => {
            for (k, child) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_into(out, key, child);
            }
        }
        serde_json::Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        serde_json::Value::Null => {}
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/locale.rs"]
mod tests;
