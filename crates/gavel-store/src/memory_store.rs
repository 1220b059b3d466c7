//! In-process implementation of the `SharedStore` trait.
//!
//! Holds the whole tree in memory behind a mutex and fans changes out to
//! subscribers over `tokio::sync::watch` channels. Used by the demo server
//! and by tests; every client sharing one `MemoryStore` sees the same tree.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use async_trait::async_trait;
use gavel_core::change::{ChangeSet, StoreWrite, is_vacant};
use gavel_core::error::DomainError;
use gavel_core::path::StorePath;
use gavel_core::store::{SharedStore, Subscription, generate_child_key};
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::tree;

struct Subscriber {
    id: u64,
    path: StorePath,
    sender: watch::Sender<Option<Value>>,
}

struct Inner {
    root: Value,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
    available: bool,
}

impl Inner {
    fn ensure_available(&self) -> Result<(), DomainError> {
        if self.available {
            Ok(())
        } else {
            Err(DomainError::StoreUnavailable("memory store is offline".into()))
        }
    }

    fn value_at(&self, path: &StorePath) -> Option<Value> {
        snapshot(&self.root, path)
    }

    /// Pushes the current value to every subscriber that can see a change
    /// at one of `changed`, and forgets subscribers whose handle is gone.
    fn notify(&mut self, changed: &[&StorePath]) {
        self.subscribers.retain(|s| !s.sender.is_closed());
        for subscriber in &self.subscribers {
            if !changed.iter().any(|path| path.overlaps(&subscriber.path)) {
                continue;
            }
            let latest = snapshot(&self.root, &subscriber.path);
            subscriber.sender.send_if_modified(|current| {
                if *current == latest {
                    false
                } else {
                    *current = latest;
                    true
                }
            });
        }
    }
}

fn snapshot(root: &Value, path: &StorePath) -> Option<Value> {
    path.lookup(root).filter(|value| !is_vacant(value)).cloned()
}

/// A shared store living in this process.
///
/// Cloning is cheap; clones share the same tree.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// An empty, available store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                root: Value::Object(Map::new()),
                subscribers: Vec::new(),
                next_subscriber_id: 0,
                available: true,
            })),
        }
    }

    /// Takes the store offline (`false`) or back online (`true`). While
    /// offline every operation fails with `StoreUnavailable` and existing
    /// subscriptions receive nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store lock is poisoned.
    pub fn set_available(&self, available: bool) -> Result<(), DomainError> {
        self.lock()?.available = available;
        Ok(())
    }

    /// Number of live subscriptions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store lock is poisoned.
    pub fn subscriber_count(&self) -> Result<usize, DomainError> {
        let mut inner = self.lock()?;
        inner.subscribers.retain(|s| !s.sender.is_closed());
        Ok(inner.subscribers.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DomainError> {
        lock(&self.inner)
    }

    fn write_locked(&self, path: &StorePath, value: Value) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        inner.ensure_available()?;
        tree::set(&mut inner.root, path, value);
        inner.notify(&[path]);
        Ok(())
    }
}

fn lock(inner: &Mutex<Inner>) -> Result<MutexGuard<'_, Inner>, DomainError> {
    inner
        .lock()
        .map_err(|_| DomainError::Infrastructure("memory store lock poisoned".into()))
}

#[async_trait]
impl SharedStore for MemoryStore {
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, DomainError> {
        let inner = self.lock()?;
        inner.ensure_available()?;
        Ok(inner.value_at(path))
    }

    async fn subscribe(&self, path: &StorePath) -> Result<Subscription, DomainError> {
        let mut inner = self.lock()?;
        inner.ensure_available()?;

        let (sender, receiver) = watch::channel(inner.value_at(path));
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            path: path.clone(),
            sender,
        });
        debug!(%path, id, "subscribed");

        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        let release = move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            match lock(&inner) {
                Ok(mut inner) => inner.subscribers.retain(|s| s.id != id),
                Err(e) => warn!(error = %e, id, "could not release subscription"),
            }
        };
        Ok(Subscription::new(
            path.clone(),
            receiver,
            Some(Box::new(release)),
        ))
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), DomainError> {
        self.write_locked(path, value)
    }

    async fn push_child(&self, path: &StorePath, value: Value) -> Result<String, DomainError> {
        let key = generate_child_key();
        self.write_locked(&path.child(&key), value)?;
        Ok(key)
    }

    async fn remove(&self, path: &StorePath) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        inner.ensure_available()?;
        tree::remove(&mut inner.root, path);
        inner.notify(&[path]);
        Ok(())
    }

    async fn apply(&self, changes: &ChangeSet) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        inner.ensure_available()?;

        if let Some(failed) = changes
            .guards()
            .iter()
            .find(|guard| !guard.holds(guard.path.lookup(&inner.root)))
        {
            debug!(path = %failed.path, "precondition failed");
            return Err(DomainError::ConcurrencyConflict {
                path: failed.path.to_string(),
            });
        }

        for write in changes.writes() {
            match write {
                StoreWrite::Set { path, value } => tree::set(&mut inner.root, path, value.clone()),
                StoreWrite::Remove { path } => tree::remove(&mut inner.root, path),
            }
        }
        let touched: Vec<&StorePath> = changes.writes().iter().map(StoreWrite::path).collect();
        inner.notify(&touched);
        Ok(())
    }
}
