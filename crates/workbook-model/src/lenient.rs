//! Tolerant collection decoding
//!
//! Snapshots come from other members' machines and older schema revisions.
//! One undecodable entry must not cost the whole collection.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a JSON array item by item, dropping entries that do not decode
///
/// `null` or a missing field yields an empty collection.
pub(crate) fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(decode_items(raw, std::any::type_name::<T>()))
}

pub(crate) fn decode_items<T: DeserializeOwned>(raw: Option<Value>, what: &str) -> Vec<T> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    tracing::warn!(index, kind = what, error = %err, "dropping undecodable entry");
                    None
                }
            })
            .collect(),
        Some(other) => {
            tracing::warn!(kind = what, found = type_label(&other), "expected array, using empty");
            Vec::new()
        }
    }
}

pub(crate) fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
