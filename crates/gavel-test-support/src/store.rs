//! Test stores: `SharedStore` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use gavel_core::change::{ChangeSet, StoreWrite};
use gavel_core::error::DomainError;
use gavel_core::path::StorePath;
use gavel_core::store::{SharedStore, Subscription};
use gavel_store::MemoryStore;
use serde_json::Value;

/// A working in-memory store that records every mutation it receives.
///
/// Plain writes, pushes and removals are recorded as `StoreWrite`s; change
/// sets are recorded whether or not their preconditions held.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<StoreWrite>>,
    attempts: Mutex<Vec<ChangeSet>>,
    applied: Mutex<Vec<ChangeSet>>,
}

impl RecordingStore {
    /// Creates an empty recording store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying store, for seeding data and reading it back.
    #[must_use]
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Returns a snapshot of all plain writes, pushes and removals.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<StoreWrite> {
        self.writes.lock().unwrap().clone()
    }

    /// Returns every change set passed to `apply`, accepted or not.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn apply_attempts(&self) -> Vec<ChangeSet> {
        self.attempts.lock().unwrap().clone()
    }

    /// Returns the change sets the store accepted.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn applied(&self) -> Vec<ChangeSet> {
        self.applied.lock().unwrap().clone()
    }

    fn record(&self, write: StoreWrite) {
        self.writes.lock().unwrap().push(write);
    }
}

#[async_trait]
impl SharedStore for RecordingStore {
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, DomainError> {
        self.inner.read(path).await
    }

    async fn subscribe(&self, path: &StorePath) -> Result<Subscription, DomainError> {
        self.inner.subscribe(path).await
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), DomainError> {
        self.record(StoreWrite::Set {
            path: path.clone(),
            value: value.clone(),
        });
        self.inner.write(path, value).await
    }

    async fn push_child(&self, path: &StorePath, value: Value) -> Result<String, DomainError> {
        let key = self.inner.push_child(path, value.clone()).await?;
        self.record(StoreWrite::Set {
            path: path.child(&key),
            value,
        });
        Ok(key)
    }

    async fn remove(&self, path: &StorePath) -> Result<(), DomainError> {
        self.record(StoreWrite::Remove { path: path.clone() });
        self.inner.remove(path).await
    }

    async fn apply(&self, changes: &ChangeSet) -> Result<(), DomainError> {
        self.attempts.lock().unwrap().push(changes.clone());
        self.inner.apply(changes).await?;
        self.applied.lock().unwrap().push(changes.clone());
        Ok(())
    }
}

/// An in-memory store where another client gets in first: `apply` calls
/// are preceded by a configured write at one path, as if a concurrent
/// client had just changed the same data.
#[derive(Debug)]
pub struct InterferingStore {
    inner: RecordingStore,
    path: StorePath,
    values: Vec<Value>,
    repeat: bool,
    applies: Mutex<usize>,
}

impl InterferingStore {
    /// Wraps a fresh store that will write `value` at `path` right before
    /// the first `apply` only.
    #[must_use]
    pub fn new(path: StorePath, value: Value) -> Self {
        Self {
            inner: RecordingStore::new(),
            path,
            values: vec![value],
            repeat: false,
            applies: Mutex::new(0),
        }
    }

    /// Wraps a fresh store that writes at `path` before every `apply`,
    /// cycling through `values`. Give at least two distinct values so each
    /// write is a real change.
    #[must_use]
    pub fn repeating(path: StorePath, values: Vec<Value>) -> Self {
        Self {
            repeat: true,
            values,
            ..Self::new(path, Value::Null)
        }
    }

    /// The recording store underneath.
    #[must_use]
    pub fn recorded(&self) -> &RecordingStore {
        &self.inner
    }
}

#[async_trait]
impl SharedStore for InterferingStore {
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, DomainError> {
        self.inner.read(path).await
    }

    async fn subscribe(&self, path: &StorePath) -> Result<Subscription, DomainError> {
        self.inner.subscribe(path).await
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), DomainError> {
        self.inner.write(path, value).await
    }

    async fn push_child(&self, path: &StorePath, value: Value) -> Result<String, DomainError> {
        self.inner.push_child(path, value).await
    }

    async fn remove(&self, path: &StorePath) -> Result<(), DomainError> {
        self.inner.remove(path).await
    }

    async fn apply(&self, changes: &ChangeSet) -> Result<(), DomainError> {
        let n = {
            let mut applies = self.applies.lock().unwrap();
            let n = *applies;
            *applies += 1;
            n
        };
        if (self.repeat || n == 0) && !self.values.is_empty() {
            let value = self.values[n % self.values.len()].clone();
            self.inner.inner().write(&self.path, value).await?;
        }
        self.inner.apply(changes).await
    }
}

/// A store that is never reachable. Useful for testing error-handling
/// paths.
#[derive(Debug)]
pub struct UnavailableStore;

fn offline<T>() -> Result<T, DomainError> {
    Err(DomainError::StoreUnavailable("connection refused".into()))
}

#[async_trait]
impl SharedStore for UnavailableStore {
    async fn read(&self, _path: &StorePath) -> Result<Option<Value>, DomainError> {
        offline()
    }

    async fn subscribe(&self, _path: &StorePath) -> Result<Subscription, DomainError> {
        offline()
    }

    async fn write(&self, _path: &StorePath, _value: Value) -> Result<(), DomainError> {
        offline()
    }

    async fn push_child(&self, _path: &StorePath, _value: Value) -> Result<String, DomainError> {
        offline()
    }

    async fn remove(&self, _path: &StorePath) -> Result<(), DomainError> {
        offline()
    }

    async fn apply(&self, _changes: &ChangeSet) -> Result<(), DomainError> {
        offline()
    }
}
