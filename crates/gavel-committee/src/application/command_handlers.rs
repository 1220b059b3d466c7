//! Command handlers for the committee context.
//!
//! Each handler reads the smallest subtree it needs, runs a pure reducer
//! over it and writes back only the paths that changed. Caucus commands go
//! through [`update_caucus`], which turns the reducer's change set into a
//! conditional update and retries on a concurrent edit.

use gavel_core::change::ChangeSet;
use gavel_core::clock::Clock;
use gavel_core::command::Command;
use gavel_core::error::DomainError;
use gavel_core::path::StorePath;
use gavel_core::store::{SharedStore, generate_child_key};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::caucus::{Caucus, CaucusUpdate};
use crate::domain::commands::{
    AddParticipant, ApproveMotion, ClearMotions, CloseCaucus, CreateCommittee, EnqueueSpeaker,
    OpenCaucus, PauseTimer, PopSpeaker, ProposeMotion, RemoveParticipant, RemoveSpeaker,
    ResetTimer, SetAttendance, StartTimer, WithdrawMotion,
};
use crate::domain::layout::{self, encode};
use crate::domain::lenient::{decode_children, decode_or_default};
use crate::domain::motion::{Motion, MotionType};
use crate::domain::participant::Participant;

/// Attempts a caucus command makes before giving up on a busy caucus.
pub const MAX_ATTEMPTS: usize = 3;

/// Result of a successfully handled command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitteeCommandResult {
    /// The committee the command ran against.
    pub committee_id: String,
    /// The member, motion or caucus created or affected, if any.
    pub entity_id: Option<String>,
    /// What was written, with absolute paths. Empty when the command was a
    /// no-op.
    pub changes: ChangeSet,
}

impl CommitteeCommandResult {
    fn new(committee_id: &str, entity_id: Option<&str>, changes: ChangeSet) -> Self {
        Self {
            committee_id: committee_id.to_owned(),
            entity_id: entity_id.map(str::to_owned),
            changes,
        }
    }
}

fn log_command(command: &dyn Command) {
    info!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        committee_id = command.committee_id(),
        "handling command"
    );
}

fn require_name(what: &str, name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{what} name must not be blank")));
    }
    Ok(trimmed.to_owned())
}

/// Fails with `NotFound` unless the committee exists.
pub(crate) async fn require_committee(
    store: &dyn SharedStore,
    committee_id: &str,
) -> Result<(), DomainError> {
    let name = layout::committee(committee_id).child("name");
    match store.read(&name).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::NotFound(layout::committee(committee_id).to_string())),
    }
}

async fn require_present(store: &dyn SharedStore, path: &StorePath) -> Result<(), DomainError> {
    match store.read(path).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::NotFound(path.to_string())),
    }
}

/// Handles the `CreateCommittee` command: stores the committee's name and
/// topic under the caller-chosen id, refusing to overwrite an existing one.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank name and
/// `DomainError::ConcurrencyConflict` if the id is already taken.
pub async fn handle_create_committee(
    command: &CreateCommittee,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    let name = require_name("committee", &command.name)?;
    let root = layout::committee(&command.committee_id);

    let changes = ChangeSet::new()
        .expect(root.child("name"), None)
        .set(root.child("name"), json!(name))
        .set(root.child("topic"), json!(command.topic.trim()));
    store.apply(&changes).await?;

    Ok(CommitteeCommandResult::new(
        &command.committee_id,
        Some(&command.committee_id),
        changes,
    ))
}

/// Handles the `AddParticipant` command: pushes a new member unless one with
/// the same name is already on the roster.
///
/// Two clients adding the same name at the same moment can both succeed;
/// the roster check is against the latest snapshot, not a lock.
///
/// # Errors
///
/// Returns `DomainError::DuplicateParticipant` if the name is taken,
/// `DomainError::Validation` for a blank name, and `DomainError::NotFound`
/// if the committee does not exist.
pub async fn handle_add_participant(
    command: &AddParticipant,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    let name = require_name("participant", &command.participant.name)?;
    require_committee(store, &command.committee_id).await?;

    let members_path = layout::members(&command.committee_id);
    let roster: std::collections::BTreeMap<String, Participant> =
        decode_children(store.read(&members_path).await?.as_ref(), "participant");
    if roster.values().any(|member| member.name == name) {
        return Err(DomainError::DuplicateParticipant(name));
    }

    let participant = Participant {
        name,
        ..command.participant.clone()
    };
    let value = encode(&participant)?;
    let member_id = store.push_child(&members_path, value.clone()).await?;
    debug!(%member_id, "participant added");

    Ok(CommitteeCommandResult::new(
        &command.committee_id,
        Some(&member_id),
        ChangeSet::new().set(members_path.child(&member_id), value),
    ))
}

/// Handles the `RemoveParticipant` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the member does not exist.
pub async fn handle_remove_participant(
    command: &RemoveParticipant,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    let path = layout::member(&command.committee_id, &command.member_id);
    require_present(store, &path).await?;
    store.remove(&path).await?;

    Ok(CommitteeCommandResult::new(
        &command.committee_id,
        Some(&command.member_id),
        ChangeSet::new().remove(path),
    ))
}

/// Handles the `SetAttendance` command: writes each provided field to its
/// own path.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the member does not exist.
pub async fn handle_set_attendance(
    command: &SetAttendance,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    let path = layout::member(&command.committee_id, &command.member_id);
    let Some(snapshot) = store.read(&path).await? else {
        return Err(DomainError::NotFound(path.to_string()));
    };

    // A member removed meanwhile must not come back as a bare set of flags.
    let mut changes = ChangeSet::new().expect(path.child("name"), snapshot.get("name").cloned());
    if let Some(present) = command.present {
        changes = changes.set(path.child("present"), json!(present));
    }
    if let Some(voting) = command.voting {
        changes = changes.set(path.child("voting"), json!(voting));
    }
    if let Some(rank) = command.rank {
        changes = changes.set(path.child("rank"), encode(&rank)?);
    }
    if changes.is_empty() {
        debug!("attendance unchanged");
    } else {
        store.apply(&changes).await?;
    }

    Ok(CommitteeCommandResult::new(
        &command.committee_id,
        Some(&command.member_id),
        changes,
    ))
}

/// Handles the `ProposeMotion` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a motion type this build does not
/// know and `DomainError::NotFound` if the committee does not exist.
pub async fn handle_propose_motion(
    command: &ProposeMotion,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    if command.motion.motion_type == MotionType::Unrecognized {
        return Err(DomainError::Validation("unrecognized motion type".into()));
    }
    require_committee(store, &command.committee_id).await?;

    let motions_path = layout::motions(&command.committee_id);
    let value = encode(&command.motion)?;
    let motion_id = store.push_child(&motions_path, value.clone()).await?;
    debug!(%motion_id, precedence = command.motion.motion_type.precedence(), "motion proposed");

    Ok(CommitteeCommandResult::new(
        &command.committee_id,
        Some(&motion_id),
        ChangeSet::new().set(motions_path.child(&motion_id), value),
    ))
}

/// Handles the `WithdrawMotion` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the motion does not exist.
pub async fn handle_withdraw_motion(
    command: &WithdrawMotion,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    let path = layout::motion(&command.committee_id, &command.motion_id);
    require_present(store, &path).await?;
    store.remove(&path).await?;

    Ok(CommitteeCommandResult::new(
        &command.committee_id,
        Some(&command.motion_id),
        ChangeSet::new().remove(path),
    ))
}

/// Handles the `ClearMotions` command: discards every pending motion.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the committee does not exist.
pub async fn handle_clear_motions(
    command: &ClearMotions,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    require_committee(store, &command.committee_id).await?;
    let path = layout::motions(&command.committee_id);
    store.remove(&path).await?;

    Ok(CommitteeCommandResult::new(
        &command.committee_id,
        None,
        ChangeSet::new().remove(path),
    ))
}

/// Handles the `ApproveMotion` command. Approval acts on the motion and
/// withdraws it, but only for motion types marked approvable.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the motion does not exist and
/// `DomainError::Validation` if its type cannot be approved.
pub async fn handle_approve_motion(
    command: &ApproveMotion,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    let path = layout::motion(&command.committee_id, &command.motion_id);
    let Some(snapshot) = store.read(&path).await? else {
        return Err(DomainError::NotFound(path.to_string()));
    };
    let motion: Motion = decode_or_default(&snapshot, "motion");
    if !motion.traits().approvable {
        return Err(DomainError::Validation(format!(
            "{:?} motions cannot be approved",
            motion.motion_type
        )));
    }

    let changes = ChangeSet::new()
        .expect(path.clone(), Some(snapshot))
        .remove(path);
    store.apply(&changes).await?;

    Ok(CommitteeCommandResult::new(
        &command.committee_id,
        Some(&command.motion_id),
        changes,
    ))
}

/// Handles the `OpenCaucus` command: pushes a caucus with both timers idle.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank name and
/// `DomainError::NotFound` if the committee does not exist.
pub async fn handle_open_caucus(
    command: &OpenCaucus,
    clock: &dyn Clock,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    let name = require_name("caucus", &command.name)?;
    require_committee(store, &command.committee_id).await?;

    let caucus = Caucus::new(
        name,
        command.caucus_duration,
        command.speaker_duration,
        clock.now(),
    );
    let caucuses_path = layout::caucuses(&command.committee_id);
    let value = encode(&caucus)?;
    let caucus_id = store.push_child(&caucuses_path, value.clone()).await?;
    debug!(%caucus_id, "caucus opened");

    Ok(CommitteeCommandResult::new(
        &command.committee_id,
        Some(&caucus_id),
        ChangeSet::new().set(caucuses_path.child(&caucus_id), value),
    ))
}

/// Handles the `CloseCaucus` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the caucus does not exist.
pub async fn handle_close_caucus(
    command: &CloseCaucus,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    let path = layout::caucus(&command.committee_id, &command.caucus_id);
    require_present(store, &path).await?;
    store.remove(&path).await?;

    Ok(CommitteeCommandResult::new(
        &command.committee_id,
        Some(&command.caucus_id),
        ChangeSet::new().remove(path),
    ))
}

/// Runs `reduce` against the latest caucus and applies its change set,
/// re-reading and re-running up to [`MAX_ATTEMPTS`] times while another
/// client keeps changing the same fields.
///
/// Every change set also pins the caucus name, so a caucus closed in the
/// meantime is not resurrected by a late write.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the caucus does not exist,
/// `DomainError::ConcurrencyConflict` once attempts are exhausted, or
/// whatever `reduce` fails with.
pub async fn update_caucus<F>(
    command: &dyn Command,
    caucus_id: &str,
    clock: &dyn Clock,
    store: &dyn SharedStore,
    mut reduce: F,
) -> Result<CommitteeCommandResult, DomainError>
where
    F: FnMut(&Caucus, chrono::DateTime<chrono::Utc>) -> Result<CaucusUpdate, DomainError> + Send,
{
    let path = layout::caucus(command.committee_id(), caucus_id);
    let mut attempt = 1;
    loop {
        let Some(snapshot) = store.read(&path).await? else {
            return Err(DomainError::NotFound(path.to_string()));
        };
        let caucus: Caucus = decode_or_default(&snapshot, "caucus");
        let update = reduce(&caucus, clock.now())?;
        if update.changes.is_empty() {
            debug!(command_type = command.command_type(), "no-op, nothing written");
            return Ok(CommitteeCommandResult::new(
                command.committee_id(),
                Some(caucus_id),
                ChangeSet::new(),
            ));
        }

        let changes = update
            .changes
            .expect_unchanged(StorePath::root().child("name"))
            .resolve(&path, Some(&snapshot));
        match store.apply(&changes).await {
            Ok(()) => {
                return Ok(CommitteeCommandResult::new(
                    command.committee_id(),
                    Some(caucus_id),
                    changes,
                ));
            }
            Err(DomainError::ConcurrencyConflict { path: conflict }) if attempt < MAX_ATTEMPTS => {
                warn!(
                    command_type = command.command_type(),
                    correlation_id = %command.correlation_id(),
                    %conflict,
                    attempt,
                    "caucus changed concurrently, retrying"
                );
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Handles the `EnqueueSpeaker` command.
///
/// # Errors
///
/// See [`update_caucus`].
pub async fn handle_enqueue_speaker(
    command: &EnqueueSpeaker,
    clock: &dyn Clock,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    let name = command.name.trim();
    update_caucus(command, &command.caucus_id, clock, store, |caucus, _| {
        caucus.enqueue(name)
    })
    .await
}

/// Handles the `PopSpeaker` command.
///
/// # Errors
///
/// See [`update_caucus`].
pub async fn handle_pop_speaker(
    command: &PopSpeaker,
    clock: &dyn Clock,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    update_caucus(command, &command.caucus_id, clock, store, |caucus, now| {
        caucus.pop_speaker(now, &generate_child_key())
    })
    .await
}

/// Handles the `RemoveSpeaker` command.
///
/// # Errors
///
/// See [`update_caucus`].
pub async fn handle_remove_speaker(
    command: &RemoveSpeaker,
    clock: &dyn Clock,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    update_caucus(command, &command.caucus_id, clock, store, |caucus, _| {
        caucus.remove_speaker(&command.name)
    })
    .await
}

/// Handles the `StartTimer` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if the timer is running or
/// expired; otherwise see [`update_caucus`].
pub async fn handle_start_timer(
    command: &StartTimer,
    clock: &dyn Clock,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    update_caucus(command, &command.caucus_id, clock, store, |caucus, now| {
        caucus.start_timer(command.kind, now)
    })
    .await
}

/// Handles the `PauseTimer` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless the timer is running;
/// otherwise see [`update_caucus`].
pub async fn handle_pause_timer(
    command: &PauseTimer,
    clock: &dyn Clock,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    update_caucus(command, &command.caucus_id, clock, store, |caucus, now| {
        caucus.pause_timer(command.kind, now)
    })
    .await
}

/// Handles the `ResetTimer` command.
///
/// # Errors
///
/// See [`update_caucus`].
pub async fn handle_reset_timer(
    command: &ResetTimer,
    clock: &dyn Clock,
    store: &dyn SharedStore,
) -> Result<CommitteeCommandResult, DomainError> {
    log_command(command);
    update_caucus(command, &command.caucus_id, clock, store, |caucus, now| {
        caucus.reset_timer(command.kind, command.duration, now)
    })
    .await
}
