//! Path edits on a JSON tree with the store's storage rules.
//!
//! Nothing vacant is ever stored: `null`, `{}` and `[]` mean "absent", and
//! removing the last child of an object removes the object too.

use gavel_core::change::is_vacant;
use gavel_core::path::StorePath;
use serde_json::{Map, Value};

/// Strips nulls and vacant containers out of `value`. Returns `None` when
/// nothing is left.
pub(crate) fn normalize(value: Value) -> Option<Value> {
    let normalized = match value {
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .filter_map(|(key, child)| normalize(child).map(|child| (key, child)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().filter_map(normalize).collect()),
        scalar => scalar,
    };
    (!is_vacant(&normalized)).then_some(normalized)
}

/// Stores `value` at `path`, or removes the path when `value` normalizes to
/// nothing.
pub(crate) fn set(root: &mut Value, path: &StorePath, value: Value) {
    match normalize(value) {
        Some(value) => set_at(root, path.segments(), value),
        None => remove(root, path),
    }
}

/// Removes `path` and every ancestor left empty by the removal.
pub(crate) fn remove(root: &mut Value, path: &StorePath) {
    if path.is_root() {
        *root = Value::Object(Map::new());
    } else {
        remove_at(root, path.segments());
    }
}

fn set_at(node: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        *node = Value::Object(into_object(node.take()));
    }
    if let Value::Object(entries) = node {
        let child = entries.entry(head.clone()).or_insert(Value::Null);
        set_at(child, rest, value);
    }
}

fn remove_at(node: &mut Value, segments: &[String]) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };
    if node.is_array() {
        *node = Value::Object(into_object(node.take()));
    }
    let Value::Object(entries) = node else {
        return false;
    };
    if rest.is_empty() {
        return entries.remove(head).is_some();
    }
    let Some(child) = entries.get_mut(head) else {
        return false;
    };
    let removed = remove_at(child, rest);
    if removed && is_vacant(child) {
        entries.remove(head);
    }
    removed
}

/// Object form of `value`, so a child can be addressed by key. Array
/// elements keep their index as key; scalars are discarded.
fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(entries) => entries,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (i.to_string(), item))
            .collect(),
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> StorePath {
        StorePath::parse(raw)
    }

    #[test]
    fn test_normalize_drops_nulls_and_empty_containers() {
        let value = json!({"a": null, "b": {}, "c": [], "d": {"e": null}, "f": 1});
        assert_eq!(normalize(value), Some(json!({"f": 1})));
        assert_eq!(normalize(json!({"a": null})), None);
        assert_eq!(normalize(json!(["A", null, "B"])), Some(json!(["A", "B"])));
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut root = json!({});
        set(&mut root, &path("committees/c1/name"), json!("DISEC"));
        assert_eq!(root, json!({"committees": {"c1": {"name": "DISEC"}}}));
    }

    #[test]
    fn test_set_replaces_without_merging() {
        let mut root = json!({"t": {"a": 1, "b": 2}});
        set(&mut root, &path("t"), json!({"c": 3}));
        assert_eq!(root, json!({"t": {"c": 3}}));
    }

    #[test]
    fn test_set_null_removes_and_prunes() {
        let mut root = json!({"c": {"k": {"speaking": "A"}}, "other": 1});
        set(&mut root, &path("c/k/speaking"), Value::Null);
        assert_eq!(root, json!({"other": 1}));
    }

    #[test]
    fn test_remove_missing_path_is_noop() {
        let mut root = json!({"a": {"b": 1}});
        remove(&mut root, &path("a/x/y"));
        remove(&mut root, &path("a/b/c"));
        assert_eq!(root, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_child_of_array_is_addressable() {
        let mut root = json!({"queue": ["A", "B"]});
        set(&mut root, &path("queue/2"), json!("C"));
        assert_eq!(root, json!({"queue": {"0": "A", "1": "B", "2": "C"}}));
    }

    #[test]
    fn test_remove_root_clears_everything() {
        let mut root = json!({"a": 1});
        remove(&mut root, &StorePath::root());
        assert_eq!(root, json!({}));
    }
}
