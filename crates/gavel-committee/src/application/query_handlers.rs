//! Query handlers for the committee context.
//!
//! Queries read the smallest subtree that answers them and return
//! read-only view DTOs. Timer views are projected at the caller's clock.

use gavel_core::clock::Clock;
use gavel_core::error::DomainError;
use gavel_core::store::SharedStore;
use serde::Serialize;

use crate::application::command_handlers::require_committee;
use crate::domain::attendance::AttendanceStats;
use crate::domain::caucus::{Caucus, CaucusView};
use crate::domain::committee::{Committee, SpeakerTally};
use crate::domain::layout;
use crate::domain::lenient::{decode_children, decode_or_default};
use crate::domain::motion::Motion;
use crate::domain::participant::Participant;
use crate::domain::ranking::{MotionId, rank_motions};

/// A pending motion in procedural order.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMotionView {
    /// The motion identifier.
    pub motion_id: MotionId,
    /// Precedence of the motion's type; lower acts first.
    pub precedence: u8,
    /// The motion as stored.
    #[serde(flatten)]
    pub motion: Motion,
}

/// Name and id of one caucus.
#[derive(Debug, Clone, Serialize)]
pub struct CaucusSummary {
    /// The caucus identifier.
    pub caucus_id: String,
    /// Display name.
    pub name: String,
}

/// Overview of a committee.
#[derive(Debug, Clone, Serialize)]
pub struct CommitteeSummaryView {
    /// The committee identifier.
    pub committee_id: String,
    /// Committee name.
    pub name: String,
    /// Agenda topic.
    pub topic: String,
    /// Roster size.
    pub member_count: usize,
    /// Pending motions.
    pub motion_count: usize,
    /// The motion to act on next, if any.
    pub next_motion_id: Option<MotionId>,
    /// Open caucuses.
    pub caucuses: Vec<CaucusSummary>,
    /// Quorum figures for the roster.
    pub attendance: AttendanceStats,
}

/// A caucus projected at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct CaucusSnapshotView {
    /// The caucus identifier.
    pub caucus_id: String,
    /// Queue, floor, history and both timers.
    #[serde(flatten)]
    pub caucus: CaucusView,
}

/// Loads a whole committee.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if nothing is stored for the committee.
pub async fn get_committee(
    committee_id: &str,
    store: &dyn SharedStore,
) -> Result<Committee, DomainError> {
    let path = layout::committee(committee_id);
    store
        .read(&path)
        .await?
        .map(|snapshot| Committee::from_snapshot(&snapshot))
        .ok_or_else(|| DomainError::NotFound(path.to_string()))
}

/// Retrieves an overview of a committee.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the committee does not exist.
pub async fn get_committee_summary(
    committee_id: &str,
    store: &dyn SharedStore,
) -> Result<CommitteeSummaryView, DomainError> {
    let committee = get_committee(committee_id, store).await?;
    Ok(CommitteeSummaryView {
        committee_id: committee_id.to_owned(),
        name: committee.name.clone(),
        topic: committee.topic.clone(),
        member_count: committee.members.len(),
        motion_count: committee.motions.len(),
        next_motion_id: committee.next_motion().map(|(id, _)| id.clone()),
        caucuses: committee
            .caucuses
            .iter()
            .map(|(caucus_id, caucus)| CaucusSummary {
                caucus_id: caucus_id.clone(),
                name: caucus.name.clone(),
            })
            .collect(),
        attendance: committee.attendance(),
    })
}

/// Retrieves pending motions, most urgent first.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the committee does not exist.
pub async fn get_ranked_motions(
    committee_id: &str,
    store: &dyn SharedStore,
) -> Result<Vec<RankedMotionView>, DomainError> {
    require_committee(store, committee_id).await?;
    let snapshot = store.read(&layout::motions(committee_id)).await?;
    let motions = decode_children::<Motion>(snapshot.as_ref(), "motion");
    Ok(rank_motions(&motions)
        .into_iter()
        .map(|(motion_id, motion)| RankedMotionView {
            motion_id: motion_id.clone(),
            precedence: motion.motion_type.precedence(),
            motion: motion.clone(),
        })
        .collect())
}

/// Computes quorum and voting thresholds from the roster.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the committee does not exist.
pub async fn get_attendance(
    committee_id: &str,
    store: &dyn SharedStore,
) -> Result<AttendanceStats, DomainError> {
    require_committee(store, committee_id).await?;
    let snapshot = store.read(&layout::members(committee_id)).await?;
    let roster = decode_children::<Participant>(snapshot.as_ref(), "participant");
    Ok(AttendanceStats::from_participants(roster.values()))
}

/// Counts how often each member has spoken, most frequent first.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the committee does not exist.
pub async fn get_speaker_stats(
    committee_id: &str,
    store: &dyn SharedStore,
) -> Result<Vec<SpeakerTally>, DomainError> {
    Ok(get_committee(committee_id, store).await?.speaker_stats())
}

/// Retrieves a caucus with both timers projected at `clock.now()`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the caucus does not exist.
pub async fn get_caucus(
    committee_id: &str,
    caucus_id: &str,
    clock: &dyn Clock,
    store: &dyn SharedStore,
) -> Result<CaucusSnapshotView, DomainError> {
    let path = layout::caucus(committee_id, caucus_id);
    let Some(snapshot) = store.read(&path).await? else {
        return Err(DomainError::NotFound(path.to_string()));
    };
    let caucus: Caucus = decode_or_default(&snapshot, "caucus");
    Ok(CaucusSnapshotView {
        caucus_id: caucus_id.to_owned(),
        caucus: caucus.view_at(clock.now()),
    })
}
