//! Key case conversion between the wire format (`lowerCamelCase`) and
//! internal field names (`snake_case`).
//!
//! Conversion walks nested objects and arrays. Any key listed as opaque keeps
//! its value byte-for-byte; only the key itself is renamed.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Keys whose values are caller-defined session attributes.
pub const SESSION_ATTRIBUTE_KEYS: &[&str] = &["attributes", "sessionAttributes", "session_attributes"];

// Uppercase letter opening a lowercase run, e.g. the `P` in `AudioPlayer`
static WORD_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));
static WORD_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));
static UNDERSCORE_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([a-z])").expect("valid regex"));

/// Convert a single key to `snake_case`.
pub fn to_snake_case(name: &str) -> String {
    let split = WORD_START_RE.replace_all(name, "${1}_${2}");
    WORD_BOUNDARY_RE
        .replace_all(&split, "${1}_${2}")
        .to_lowercase()
}

/// Convert a single key to `lowerCamelCase`.
///
/// `system` and `audio_player` are capitalized context keys on the wire and
/// map to `System` and `AudioPlayer`.
pub fn to_camel_case(name: &str) -> String {
    match name {
        "system" => return "System".to_string(),
        "audio_player" => return "AudioPlayer".to_string(),
        _ => {}
    }
    UNDERSCORE_LETTER_RE
        .replace_all(name, |caps: &regex::Captures| caps[1].to_uppercase())
        .replace('_', "")
}

/// Rewrite every key in `value` to `snake_case`, leaving `opaque` subtrees untouched.
pub fn to_snake(value: &Value, opaque: &[&str]) -> Value {
    convert_keys(value, &to_snake_case, opaque)
}

/// Rewrite every key in `value` to `lowerCamelCase`, leaving `opaque` subtrees untouched.
pub fn to_camel(value: &Value, opaque: &[&str]) -> Value {
    convert_keys(value, &to_camel_case, opaque)
}

fn convert_keys(value: &Value, convert: &dyn Fn(&str) -> String, opaque: &[&str]) -> Value {
    match value {
        Value::Object(map) => {
            let mut converted = Map::with_capacity(map.len());
            for (key, inner) in map {
                let inner = if opaque.contains(&key.as_str()) {
                    inner.clone()
                } else {
                    convert_keys(inner, convert, opaque)
                };
                converted.insert(convert(key), inner);
            }
            Value::Object(converted)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| convert_keys(item, convert, opaque))
                .collect(),
        ),
        other => other.clone(),
    }
}
