//! Where committee data lives in the shared store.
//!
//! ```text
//! committees/{committee_id}/name
//! committees/{committee_id}/topic
//! committees/{committee_id}/members/{member_id}
//! committees/{committee_id}/motions/{motion_id}
//! committees/{committee_id}/caucuses/{caucus_id}
//! ```

use gavel_core::error::DomainError;
use gavel_core::path::StorePath;
use serde::Serialize;
use serde_json::Value;

/// Root of every committee.
#[must_use]
pub fn committees() -> StorePath {
    StorePath::root().child("committees")
}

/// A committee subtree.
#[must_use]
pub fn committee(committee_id: &str) -> StorePath {
    committees().child(committee_id)
}

/// The roster of a committee.
#[must_use]
pub fn members(committee_id: &str) -> StorePath {
    committee(committee_id).child("members")
}

/// One member.
#[must_use]
pub fn member(committee_id: &str, member_id: &str) -> StorePath {
    members(committee_id).child(member_id)
}

/// Pending motions of a committee.
#[must_use]
pub fn motions(committee_id: &str) -> StorePath {
    committee(committee_id).child("motions")
}

/// One pending motion.
#[must_use]
pub fn motion(committee_id: &str, motion_id: &str) -> StorePath {
    motions(committee_id).child(motion_id)
}

/// Caucuses of a committee.
#[must_use]
pub fn caucuses(committee_id: &str) -> StorePath {
    committee(committee_id).child("caucuses")
}

/// One caucus.
#[must_use]
pub fn caucus(committee_id: &str, caucus_id: &str) -> StorePath {
    caucuses(committee_id).child(caucus_id)
}

/// Checks that an id names exactly one path segment.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the id is empty or contains `/`.
pub fn check_id(id: &str) -> Result<&str, DomainError> {
    if id.is_empty() || id.contains('/') {
        return Err(DomainError::Validation(format!(
            "id {id:?} must be a single non-empty path segment"
        )));
    }
    Ok(id)
}

/// Encodes a domain value for storage.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if serialization fails.
pub fn encode<T: Serialize>(value: &T) -> Result<Value, DomainError> {
    serde_json::to_value(value)
        .map_err(|e| DomainError::Infrastructure(format!("serialization failed: {e}")))
}
