//! Client-side view of a live committee.
//!
//! A `CommitteeSession` subscribes to one committee and keeps the most
//! recent snapshot decoded. Readers always get a whole, immutable
//! `Committee`; nothing is patched in place. Dropping the session releases
//! the subscription.

use std::sync::Arc;

use gavel_core::error::DomainError;
use gavel_core::store::{SharedStore, Subscription};
use serde_json::Value;
use tracing::debug;

use crate::domain::committee::Committee;
use crate::domain::layout;

/// A live subscription to one committee.
#[derive(Debug)]
pub struct CommitteeSession {
    committee_id: String,
    subscription: Subscription,
    current: Option<Arc<Committee>>,
}

fn decode(snapshot: Option<&Value>) -> Option<Arc<Committee>> {
    snapshot.map(|value| Arc::new(Committee::from_snapshot(value)))
}

impl CommitteeSession {
    /// Subscribes to `committee_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreUnavailable` if the store cannot be
    /// reached.
    pub async fn open(store: &dyn SharedStore, committee_id: &str) -> Result<Self, DomainError> {
        let subscription = store.subscribe(&layout::committee(committee_id)).await?;
        let current = decode(subscription.latest().as_ref());
        debug!(committee_id, loaded = current.is_some(), "committee session opened");
        Ok(Self {
            committee_id: committee_id.to_owned(),
            subscription,
            current,
        })
    }

    /// The committee this session follows.
    #[must_use]
    pub fn committee_id(&self) -> &str {
        &self.committee_id
    }

    /// The latest snapshot, or `None` while nothing has arrived (or the
    /// committee does not exist).
    #[must_use]
    pub fn current(&self) -> Option<Arc<Committee>> {
        self.current.clone()
    }

    /// Waits for the next snapshot and makes it current.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreUnavailable` if the store stopped
    /// publishing. The last good snapshot stays current.
    pub async fn changed(&mut self) -> Result<Option<Arc<Committee>>, DomainError> {
        let snapshot = self.subscription.changed().await?;
        self.current = decode(snapshot.as_ref());
        Ok(self.current())
    }

    /// Ends the session and releases its subscription.
    pub fn close(self) {
        debug!(committee_id = %self.committee_id, "committee session closed");
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gavel_core::store::SharedStore;
    use serde_json::json;

    use super::*;
    use gavel_test_support::{RecordingStore, UnavailableStore};

    #[tokio::test]
    async fn test_session_follows_committee_changes() {
        // Arrange
        let store = RecordingStore::new();
        store
            .write(&layout::committee("c1"), json!({"name": "DISEC"}))
            .await
            .unwrap();
        let mut session = CommitteeSession::open(&store, "c1").await.unwrap();
        let before = session.current().unwrap();

        // Act
        store
            .write(
                &layout::member("c1", "m1"),
                json!({"name": "France", "present": true}),
            )
            .await
            .unwrap();
        let after = tokio::time::timeout(Duration::from_secs(1), session.changed())
            .await
            .unwrap()
            .unwrap()
            .unwrap();

        // Assert
        assert!(before.members.is_empty());
        assert_eq!(after.members["m1"].name, "France");
        assert_eq!(session.current().unwrap().members.len(), 1);
    }

    #[tokio::test]
    async fn test_session_on_missing_committee_has_no_snapshot() {
        let store = RecordingStore::new();

        let session = CommitteeSession::open(&store, "nope").await.unwrap();

        assert!(session.current().is_none());
        assert_eq!(session.committee_id(), "nope");
    }

    #[tokio::test]
    async fn test_closing_session_releases_subscription() {
        // Arrange
        let store = RecordingStore::new();
        let first = CommitteeSession::open(&store, "c1").await.unwrap();
        let second = CommitteeSession::open(&store, "c1").await.unwrap();
        assert_eq!(store.inner().subscriber_count().unwrap(), 2);

        // Act
        first.close();
        drop(second);

        // Assert
        assert_eq!(store.inner().subscriber_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_session_cannot_open_on_unavailable_store() {
        let result = CommitteeSession::open(&UnavailableStore, "c1").await;

        assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));
    }
}
