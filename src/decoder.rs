//! Decoding of configuration files into generic key-value trees
//!
//! Every supported format is decoded into a `serde_json::Value`. Keeping a
//! single tree type lets the theme-config merger combine a modern config and a
//! legacy descriptor without per-format schema types.

use serde_json::{Map, Value};

use crate::error::Result;

/// Config file extensions, in probing order.
pub const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// A structured configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    /// Detect a format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Format::Toml),
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Decodes raw configuration bytes into a generic tree
pub trait ConfigDecoder: Send + Sync {
    /// Decode `data` in the given format.
    ///
    /// The result is always a map at the top level; empty input decodes to an
    /// empty map.
    fn decode(&self, data: &[u8], format: Format) -> Result<Map<String, Value>>;
}

/// Decoder backed by `toml`, `serde_yaml` and `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDecoder;

impl ConfigDecoder for DefaultDecoder {
    fn decode(&self, data: &[u8], format: Format) -> Result<Map<String, Value>> {
        let text = String::from_utf8_lossy(data);
        if text.trim().is_empty() {
            return Ok(Map::new());
        }

        let value: Value = match format {
            Format::Toml => toml::from_str(&text)?,
            Format::Yaml => serde_yaml::from_str(&text)?,
            Format::Json => serde_json::from_str(&text)?,
        };

        match value {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(<serde_json::Error as serde::de::Error>::custom(format!(
                "expected a map at the top level, found {}",
                kind_of(&other)
            ))
            .into()),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}

/// Recursively lowercase all map keys, including maps nested in lists.
pub fn lowercase_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (key.to_lowercase(), lowercase_value(value)))
        .collect()
}

fn lowercase_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(lowercase_keys(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_value).collect()),
        other => other,
    }
}

/// Render a scalar config value as a string.
///
/// Legacy descriptors sometimes write versions as bare numbers
/// (`min_version = 0.55`), so numbers are accepted too.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
