//! Commands for the committee context.

use std::time::Duration;

use gavel_core::command::Command;
use uuid::Uuid;

use super::motion::Motion;
use super::participant::{Participant, Rank};
use super::ranking::MotionId;
use super::timer::TimerKind;

/// Command to create a committee.
#[derive(Debug, Clone)]
pub struct CreateCommittee {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identifier for the new committee, generated by the caller.
    pub committee_id: String,
    /// Committee name.
    pub name: String,
    /// Agenda topic.
    pub topic: String,
}

impl Command for CreateCommittee {
    fn command_type(&self) -> &'static str {
        "committee.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to add a member to the roster.
#[derive(Debug, Clone)]
pub struct AddParticipant {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The member to add.
    pub participant: Participant,
}

impl Command for AddParticipant {
    fn command_type(&self) -> &'static str {
        "committee.add_participant"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to remove a member from the roster.
#[derive(Debug, Clone)]
pub struct RemoveParticipant {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The member to remove.
    pub member_id: String,
}

impl Command for RemoveParticipant {
    fn command_type(&self) -> &'static str {
        "committee.remove_participant"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to update a member's attendance or rank. Unset fields are left alone.
#[derive(Debug, Clone)]
pub struct SetAttendance {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The member to update.
    pub member_id: String,
    /// New presence, if changing.
    pub present: Option<bool>,
    /// New voting declaration, if changing.
    pub voting: Option<bool>,
    /// New rank, if changing.
    pub rank: Option<Rank>,
}

impl Command for SetAttendance {
    fn command_type(&self) -> &'static str {
        "committee.set_attendance"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to propose a motion.
#[derive(Debug, Clone)]
pub struct ProposeMotion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The motion to add.
    pub motion: Motion,
}

impl Command for ProposeMotion {
    fn command_type(&self) -> &'static str {
        "committee.propose_motion"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to withdraw one pending motion.
#[derive(Debug, Clone)]
pub struct WithdrawMotion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The motion to withdraw.
    pub motion_id: MotionId,
}

impl Command for WithdrawMotion {
    fn command_type(&self) -> &'static str {
        "committee.withdraw_motion"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to discard every pending motion.
#[derive(Debug, Clone)]
pub struct ClearMotions {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
}

impl Command for ClearMotions {
    fn command_type(&self) -> &'static str {
        "committee.clear_motions"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to approve a pending motion.
#[derive(Debug, Clone)]
pub struct ApproveMotion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The motion to approve.
    pub motion_id: MotionId,
}

impl Command for ApproveMotion {
    fn command_type(&self) -> &'static str {
        "committee.approve_motion"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to open a caucus.
#[derive(Debug, Clone)]
pub struct OpenCaucus {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// Caucus name.
    pub name: String,
    /// Length of the caucus.
    pub caucus_duration: Duration,
    /// Time given to each speaker.
    pub speaker_duration: Duration,
}

impl Command for OpenCaucus {
    fn command_type(&self) -> &'static str {
        "committee.open_caucus"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to close a caucus.
#[derive(Debug, Clone)]
pub struct CloseCaucus {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The caucus to close.
    pub caucus_id: String,
}

impl Command for CloseCaucus {
    fn command_type(&self) -> &'static str {
        "committee.close_caucus"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to add a member to a caucus speaker queue.
#[derive(Debug, Clone)]
pub struct EnqueueSpeaker {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The caucus.
    pub caucus_id: String,
    /// Member name.
    pub name: String,
}

impl Command for EnqueueSpeaker {
    fn command_type(&self) -> &'static str {
        "caucus.enqueue_speaker"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to give the floor to the next queued speaker.
#[derive(Debug, Clone)]
pub struct PopSpeaker {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The caucus.
    pub caucus_id: String,
}

impl Command for PopSpeaker {
    fn command_type(&self) -> &'static str {
        "caucus.pop_speaker"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to take a member off the queue or the floor.
#[derive(Debug, Clone)]
pub struct RemoveSpeaker {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The caucus.
    pub caucus_id: String,
    /// Member name.
    pub name: String,
}

impl Command for RemoveSpeaker {
    fn command_type(&self) -> &'static str {
        "caucus.remove_speaker"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to start or resume a caucus timer.
#[derive(Debug, Clone)]
pub struct StartTimer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The caucus.
    pub caucus_id: String,
    /// Which timer.
    pub kind: TimerKind,
}

impl Command for StartTimer {
    fn command_type(&self) -> &'static str {
        "caucus.start_timer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to pause a caucus timer.
#[derive(Debug, Clone)]
pub struct PauseTimer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The caucus.
    pub caucus_id: String,
    /// Which timer.
    pub kind: TimerKind,
}

impl Command for PauseTimer {
    fn command_type(&self) -> &'static str {
        "caucus.pause_timer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}

/// Command to reset a caucus timer.
#[derive(Debug, Clone)]
pub struct ResetTimer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The committee to act on.
    pub committee_id: String,
    /// The caucus.
    pub caucus_id: String,
    /// Which timer.
    pub kind: TimerKind,
    /// New duration; the configured one when `None`.
    pub duration: Option<Duration>,
}

impl Command for ResetTimer {
    fn command_type(&self) -> &'static str {
        "caucus.reset_timer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn committee_id(&self) -> &str {
        &self.committee_id
    }
}
