//! Forgiving field deserializers for model-authored JSON.
//!
//! Models routinely answer a list field with a bare string, or a text field
//! with a list. These helpers accept any JSON shape and never fail on one
//! they do not expect; unusable shapes read as empty.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a list of strings from a string, an array or anything else.
///
/// A string is split on commas and newlines. Array entries that are
/// strings, numbers or booleans are kept as text; other entries are
/// dropped. Blank entries never survive.
///
/// # Errors
///
/// Fails only when the underlying input is not valid JSON.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(list_from_value)
}

/// Reads an optional text value from a string, a number or an array.
///
/// Arrays are joined with `", "`. Null, objects and blank text read as
/// `None`.
///
/// # Errors
///
/// Fails only when the underlying input is not valid JSON.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(text_from_value)
}

fn list_from_value(value: Value) -> Vec<String> {
    match value {
        Value::String(text) => split_list(&text),
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    }
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => scalar_text(other),
    }
}

fn split_list(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

fn scalar_text(value: Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
