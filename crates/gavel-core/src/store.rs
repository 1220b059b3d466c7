//! Shared store abstraction.
//!
//! The store is an external key-value tree with push notifications: every
//! subscriber eventually sees every write, and each exact path is
//! last-write-wins. Nothing here assumes a particular backend.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use crate::change::ChangeSet;
use crate::error::DomainError;
use crate::path::StorePath;

/// Callback run exactly once when a subscription is released.
pub type ReleaseFn = Box<dyn FnOnce() + Send + Sync>;

/// A live subscription to one subtree of the store.
///
/// Holds the latest snapshot of the subtree (`None` until the store has
/// delivered one, or while nothing is stored there). Dropping the handle
/// releases the subscription, so it is released on every exit path.
pub struct Subscription {
    path: StorePath,
    receiver: watch::Receiver<Option<Value>>,
    release: Option<ReleaseFn>,
}

impl Subscription {
    /// Wraps a watch receiver fed by a store. `release` runs when the handle
    /// is dropped or explicitly unsubscribed.
    #[must_use]
    pub fn new(
        path: StorePath,
        receiver: watch::Receiver<Option<Value>>,
        release: Option<ReleaseFn>,
    ) -> Self {
        Self {
            path,
            receiver,
            release,
        }
    }

    /// The subscribed path.
    #[must_use]
    pub fn path(&self) -> &StorePath {
        &self.path
    }

    /// The most recent snapshot, without waiting.
    #[must_use]
    pub fn latest(&self) -> Option<Value> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next snapshot and returns it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreUnavailable` if the store stopped
    /// publishing (its sender was dropped).
    pub async fn changed(&mut self) -> Result<Option<Value>, DomainError> {
        self.receiver.changed().await.map_err(|_| {
            DomainError::StoreUnavailable(format!("subscription to {} closed", self.path))
        })?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Releases the subscription. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("path", &self.path)
            .field("released", &self.release.is_none())
            .finish_non_exhaustive()
    }
}

/// Store trait for reading, subscribing to and writing the shared tree.
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// One-shot read of the subtree at `path`.
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, DomainError>;

    /// Subscribes to the subtree at `path`. The handle fires on every change
    /// anywhere under `path` (or to one of its ancestors).
    async fn subscribe(&self, path: &StorePath) -> Result<Subscription, DomainError>;

    /// Upserts `value` at exactly `path`, replacing what was there. `null`
    /// removes the path.
    async fn write(&self, path: &StorePath, value: Value) -> Result<(), DomainError>;

    /// Stores `value` under a freshly generated child key of `path` and
    /// returns that key. Keys sort in creation order.
    async fn push_child(&self, path: &StorePath, value: Value) -> Result<String, DomainError>;

    /// Removes whatever is stored at `path`.
    async fn remove(&self, path: &StorePath) -> Result<(), DomainError>;

    /// Applies a change set atomically.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConcurrencyConflict` (and writes nothing) if any
    /// precondition no longer holds.
    async fn apply(&self, changes: &ChangeSet) -> Result<(), DomainError>;
}

/// Generates a child key that sorts after every key generated earlier.
#[must_use]
pub fn generate_child_key() -> String {
    uuid::Uuid::now_v7().to_string()
}
