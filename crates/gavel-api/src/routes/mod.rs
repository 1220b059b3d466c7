//! Route modules. Committees own every other resource, so members, motions
//! and caucuses are nested under a committee id.

pub mod caucuses;
pub mod committees;
pub mod health;
pub mod members;
pub mod motions;

use serde::Serialize;
use uuid::Uuid;

use gavel_committee::application::command_handlers::CommitteeCommandResult;
use gavel_committee::domain::layout;

use crate::error::ApiError;

/// Rejects path ids that would address a nested store path, such as a
/// percent-encoded `m1%2Fname`.
fn check_ids(ids: &[&str]) -> Result<(), ApiError> {
    for id in ids {
        layout::check_id(id)?;
    }
    Ok(())
}

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// Correlation id the command was logged under.
    pub correlation_id: Uuid,
    /// The committee the command ran against.
    pub committee_id: String,
    /// The member, motion or caucus created or affected, if any.
    pub entity_id: Option<String>,
    /// Store paths written, empty for a no-op.
    pub changed_paths: Vec<String>,
}

impl CommandResponse {
    fn new(correlation_id: Uuid, result: CommitteeCommandResult) -> Self {
        Self {
            correlation_id,
            changed_paths: result
                .changes
                .writes()
                .iter()
                .map(|write| write.path().to_string())
                .collect(),
            committee_id: result.committee_id,
            entity_id: result.entity_id,
        }
    }
}
