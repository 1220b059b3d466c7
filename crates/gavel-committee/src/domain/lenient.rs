//! Forgiving decoders for data written by other clients.
//!
//! Remote data is never trusted to be well formed. Missing fields fall back
//! to defaults through `#[serde(default)]`; the helpers here cover the cases
//! serde alone would reject.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Decodes `value` as `T`, falling back to `T::default()` (with a warning)
/// when it does not fit.
pub fn decode_or_default<T>(value: &Value, what: &str) -> T
where
    T: DeserializeOwned + Default,
{
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        warn!(%what, error = %e, "malformed entry, using defaults");
        T::default()
    })
}

/// Decodes every child of an object into a map keyed by child key. A
/// non-object (including `null`) decodes as an empty map.
pub fn decode_children<T>(value: Option<&Value>, what: &str) -> BTreeMap<String, T>
where
    T: DeserializeOwned + Default,
{
    match value {
        Some(Value::Object(children)) => children
            .iter()
            .filter(|(_, child)| !child.is_null())
            .map(|(key, child)| (key.clone(), decode_or_default(child, what)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

/// `deserialize_with` helper for ordered lists. Accepts a JSON array, an
/// object whose values are taken in key order (how the store encodes sparse
/// arrays), or `null`. Elements that do not decode are skipped.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    let items: Vec<Value> = match raw {
        Value::Array(items) => items,
        Value::Object(entries) => entries.into_iter().map(|(_, v)| v).collect(),
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter(|item| !item.is_null())
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// `deserialize_with` helper for maps of child entries. Same fallbacks as
/// [`decode_children`].
pub fn children<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(decode_children(Some(&raw), std::any::type_name::<T>()))
}

/// `deserialize_with` helper turning anything that is not a string into
/// `None`.
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}
