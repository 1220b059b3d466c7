//! Targeted, conditional updates to the shared store.
//!
//! Reducers never hand back a whole subtree. They describe the exact paths
//! they touch as a [`ChangeSet`]: preconditions on the values they read, and
//! writes for the values they produce. A store applies a change set
//! atomically, or not at all when any precondition no longer holds.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::StorePath;

/// A single write at an exact path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StoreWrite {
    /// Replace whatever is stored at `path` with `value`. `null` removes.
    Set {
        /// Target path.
        path: StorePath,
        /// New value.
        value: Value,
    },
    /// Remove whatever is stored at `path`.
    Remove {
        /// Target path.
        path: StorePath,
    },
}

impl StoreWrite {
    /// The path this write targets.
    #[must_use]
    pub fn path(&self) -> &StorePath {
        match self {
            Self::Set { path, .. } | Self::Remove { path } => path,
        }
    }
}

/// The value a path must still hold for a change set to apply.
///
/// `expected: None` means the path must be absent (or `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Precondition {
    /// Guarded path.
    pub path: StorePath,
    /// Value read when the change set was computed.
    pub expected: Option<Value>,
}

impl Precondition {
    /// Returns whether `actual` satisfies this precondition. Empty objects
    /// and arrays count as absent, as they do in the store.
    #[must_use]
    pub fn holds(&self, actual: Option<&Value>) -> bool {
        let actual = actual.filter(|v| !is_vacant(v));
        let expected = self.expected.as_ref().filter(|v| !is_vacant(v));
        actual == expected
    }
}

/// Whether a value is stored as nothing at all: `null`, `{}` or `[]`.
#[must_use]
pub fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        _ => false,
    }
}

/// Preconditions plus writes, applied together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    guards: Vec<Precondition>,
    watched: Vec<StorePath>,
    writes: Vec<StoreWrite>,
}

impl ChangeSet {
    /// An empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `path` to still hold `expected` when applied.
    #[must_use]
    pub fn expect(mut self, path: StorePath, expected: Option<Value>) -> Self {
        self.guards.push(Precondition { path, expected });
        self
    }

    /// Requires `path` to still hold whatever the snapshot passed to
    /// [`ChangeSet::resolve`] holds there.
    #[must_use]
    pub fn expect_unchanged(mut self, path: StorePath) -> Self {
        if !self.watched.contains(&path) {
            self.watched.push(path);
        }
        self
    }

    /// Writes `value` at `path`.
    #[must_use]
    pub fn set(mut self, path: StorePath, value: Value) -> Self {
        self.writes.push(StoreWrite::Set { path, value });
        self
    }

    /// Removes `path`.
    #[must_use]
    pub fn remove(mut self, path: StorePath) -> Self {
        self.writes.push(StoreWrite::Remove { path });
        self
    }

    /// Paths awaiting a value from [`ChangeSet::resolve`].
    #[must_use]
    pub fn watched(&self) -> &[StorePath] {
        &self.watched
    }

    /// Preconditions, in insertion order.
    #[must_use]
    pub fn guards(&self) -> &[Precondition] {
        &self.guards
    }

    /// Writes, in the order they are applied.
    #[must_use]
    pub fn writes(&self) -> &[StoreWrite] {
        &self.writes
    }

    /// A change set without writes is a no-op, whatever its guards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Re-roots every path in this change set under `prefix`. Reducers work
    /// with paths relative to the entity they own; handlers rebase them onto
    /// the entity's location in the store.
    #[must_use]
    pub fn rebase(self, prefix: &StorePath) -> Self {
        Self {
            guards: self
                .guards
                .into_iter()
                .map(|g| Precondition {
                    path: prefix.join(&g.path),
                    expected: g.expected,
                })
                .collect(),
            watched: self.watched.iter().map(|p| prefix.join(p)).collect(),
            writes: self
                .writes
                .into_iter()
                .map(|w| match w {
                    StoreWrite::Set { path, value } => StoreWrite::Set {
                        path: prefix.join(&path),
                        value,
                    },
                    StoreWrite::Remove { path } => StoreWrite::Remove {
                        path: prefix.join(&path),
                    },
                })
                .collect(),
        }
    }

    /// Turns every watched path into a precondition on the value `snapshot`
    /// holds there, then re-roots the change set under `prefix`.
    ///
    /// `snapshot` is the raw value read at `prefix` before the reducer ran.
    /// Guarding on the raw value, not a re-encoding of the decoded state,
    /// keeps the comparison exact whatever encoding the writer used.
    #[must_use]
    pub fn resolve(mut self, prefix: &StorePath, snapshot: Option<&Value>) -> Self {
        for path in std::mem::take(&mut self.watched) {
            let expected = snapshot.and_then(|root| path.lookup(root)).cloned();
            self.guards.push(Precondition { path, expected });
        }
        self.rebase(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_precondition_treats_null_as_absent() {
        let guard = Precondition {
            path: StorePath::parse("speaking"),
            expected: None,
        };
        assert!(guard.holds(None));
        assert!(guard.holds(Some(&Value::Null)));
        assert!(!guard.holds(Some(&json!("France"))));
    }

    #[test]
    fn test_precondition_compares_whole_value() {
        let guard = Precondition {
            path: StorePath::parse("queue"),
            expected: Some(json!(["A", "B"])),
        };
        assert!(guard.holds(Some(&json!(["A", "B"]))));
        assert!(!guard.holds(Some(&json!(["B"]))));
    }

    #[test]
    fn test_rebase_prefixes_guards_and_writes() {
        // Arrange
        let prefix = StorePath::parse("committees/c1/caucuses/k1");
        let changes = ChangeSet::new()
            .expect(StorePath::parse("speaking"), None)
            .set(StorePath::parse("speaking"), json!("A"))
            .remove(StorePath::parse("queue"));

        // Act
        let rebased = changes.rebase(&prefix);

        // Assert
        assert_eq!(
            rebased.guards()[0].path.to_string(),
            "committees/c1/caucuses/k1/speaking"
        );
        assert_eq!(
            rebased.writes()[1].path().to_string(),
            "committees/c1/caucuses/k1/queue"
        );
    }

    #[test]
    fn test_resolve_pins_watched_paths_to_snapshot_values() {
        // Arrange
        let snapshot = json!({"speaking": "A", "queue": {"0": "B"}});
        let changes = ChangeSet::new()
            .expect_unchanged(StorePath::parse("speaking"))
            .expect_unchanged(StorePath::parse("queue"))
            .expect_unchanged(StorePath::parse("queue"))
            .expect_unchanged(StorePath::parse("history"))
            .set(StorePath::parse("speaking"), json!("B"));

        // Act
        let resolved = changes.resolve(&StorePath::parse("caucuses/k1"), Some(&snapshot));

        // Assert
        assert!(resolved.watched().is_empty());
        assert_eq!(resolved.guards().len(), 3);
        assert_eq!(resolved.guards()[0].path.to_string(), "caucuses/k1/speaking");
        assert_eq!(resolved.guards()[0].expected, Some(json!("A")));
        assert_eq!(resolved.guards()[1].expected, Some(json!({"0": "B"})));
        assert_eq!(resolved.guards()[2].expected, None);
    }

    #[test]
    fn test_empty_containers_count_as_absent() {
        let guard = Precondition {
            path: StorePath::parse("queue"),
            expected: Some(json!([])),
        };
        assert!(guard.holds(None));
        assert!(guard.holds(Some(&json!({}))));
        assert!(is_vacant(&Value::Null));
        assert!(!is_vacant(&json!(0)));
    }

    #[test]
    fn test_guard_only_change_set_is_empty() {
        let changes = ChangeSet::new().expect(StorePath::parse("queue"), None);
        assert!(changes.is_empty());
    }
}
