//! Slash-separated addresses into the shared store tree.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A location in the shared store, e.g. `committees/abc/caucuses/xyz/queue`.
///
/// Segments never contain `/` and are never empty. The root path has no
/// segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// The root of the store.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a slash-separated path. Empty segments are skipped, so
    /// `"/a//b/"` and `"a/b"` are the same path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Returns this path extended by `segment`. A segment containing `/` is
    /// split into several.
    #[must_use]
    pub fn child(&self, segment: impl AsRef<str>) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(
            segment
                .as_ref()
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        );
        Self { segments }
    }

    /// Returns `suffix` appended to this path.
    #[must_use]
    pub fn join(&self, suffix: &StorePath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(suffix.segments.iter().cloned());
        Self { segments }
    }

    /// Returns the parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.segments.split_last()?;
        Some(Self {
            segments: head.to_vec(),
        })
    }

    /// The last segment, or `None` for the root.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path segments from the root down.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `self` equals `prefix` or lies underneath it.
    #[must_use]
    pub fn starts_with(&self, prefix: &StorePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Finds the value at this path inside `root`, where `root` is the value
    /// stored at the path's origin. Array elements are addressed by index.
    #[must_use]
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| match node {
                Value::Object(entries) => entries.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
            .filter(|value| !value.is_null())
    }

    /// Whether a change at one of the two paths is visible from the other,
    /// i.e. one is an ancestor of (or equal to) the other.
    #[must_use]
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.starts_with(other) || other.starts_with(self)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl From<&str> for StorePath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for StorePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StorePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
