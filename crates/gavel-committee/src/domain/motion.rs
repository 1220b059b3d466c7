//! Procedural motions and their per-type traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sentinel precedence for motion types this build does not know.
pub const UNRANKED_PRECEDENCE: u8 = 69;

/// The procedural motions a delegate may raise. Stored by display label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionType {
    /// Open an unmoderated caucus.
    #[default]
    #[serde(rename = "Open Unmoderated Caucus")]
    OpenUnmoderatedCaucus,
    /// Open a moderated caucus with a speakers' list.
    #[serde(rename = "Open Moderated Caucus")]
    OpenModeratedCaucus,
    /// Extend the current unmoderated caucus.
    #[serde(rename = "Extend Unmoderated Caucus")]
    ExtendUnmoderatedCaucus,
    /// Extend the current moderated caucus.
    #[serde(rename = "Extend Moderated Caucus")]
    ExtendModeratedCaucus,
    /// Close the current moderated caucus.
    #[serde(rename = "Close Moderated Caucus")]
    CloseModeratedCaucus,
    /// Introduce a draft resolution.
    #[serde(rename = "Introduce Draft Resolution")]
    IntroduceDraftResolution,
    /// Introduce an amendment.
    #[serde(rename = "Introduce Amendment")]
    IntroduceAmendment,
    /// Suspend the draft resolution speakers' list.
    #[serde(rename = "Suspend Draft Resolution Speakers List")]
    SuspendDraftResolutionSpeakersList,
    /// Open debate.
    #[serde(rename = "Open Debate")]
    OpenDebate,
    /// Suspend debate.
    #[serde(rename = "Suspend Debate")]
    SuspendDebate,
    /// Resume debate.
    #[serde(rename = "Resume Debate")]
    ResumeDebate,
    /// Close debate.
    #[serde(rename = "Close Debate")]
    CloseDebate,
    /// Reorder the draft resolutions.
    #[serde(rename = "Reorder Draft Resolutions")]
    ReorderDraftResolutions,
    /// A label written by some other client version.
    #[serde(other, rename = "Unrecognized")]
    Unrecognized,
}

/// Static per-type behaviour of a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MotionTraits {
    /// Procedural precedence; lower acts first.
    pub precedence: u8,
    /// Whether the motion carries a free-text detail (topic, document).
    pub has_detail: bool,
    /// Whether the motion carries a caucus duration.
    pub has_duration: bool,
    /// Whether the motion carries a per-speaker duration.
    pub has_speakers: bool,
    /// Whether the motion can be approved automatically. Reserved; no type
    /// is approvable yet.
    pub approvable: bool,
}

const fn row(precedence: u8, has_detail: bool, has_duration: bool, has_speakers: bool) -> MotionTraits {
    MotionTraits {
        precedence,
        has_detail,
        has_duration,
        has_speakers,
        approvable: false,
    }
}

impl MotionType {
    /// Every known motion type, in the order offered to moderators.
    pub const ALL: [Self; 13] = [
        Self::OpenUnmoderatedCaucus,
        Self::OpenModeratedCaucus,
        Self::ExtendUnmoderatedCaucus,
        Self::ExtendModeratedCaucus,
        Self::CloseModeratedCaucus,
        Self::IntroduceDraftResolution,
        Self::IntroduceAmendment,
        Self::SuspendDraftResolutionSpeakersList,
        Self::OpenDebate,
        Self::SuspendDebate,
        Self::ResumeDebate,
        Self::CloseDebate,
        Self::ReorderDraftResolutions,
    ];

    /// The traits table. One row per type:
    /// precedence, detail, duration, speakers.
    #[must_use]
    pub const fn traits(self) -> MotionTraits {
        match self {
            Self::ExtendUnmoderatedCaucus => row(1, false, true, false),
            Self::ExtendModeratedCaucus => row(2, false, true, false),
            Self::CloseModeratedCaucus => row(2, false, false, false),
            Self::OpenUnmoderatedCaucus => row(4, false, true, false),
            Self::OpenModeratedCaucus => row(5, true, true, true),
            Self::IntroduceDraftResolution => row(6, true, false, false),
            Self::IntroduceAmendment => row(7, true, false, false),
            Self::SuspendDraftResolutionSpeakersList => row(8, false, false, false),
            Self::OpenDebate | Self::SuspendDebate | Self::ResumeDebate | Self::CloseDebate => {
                row(9, false, false, false)
            }
            Self::ReorderDraftResolutions => row(10, false, false, false),
            Self::Unrecognized => row(UNRANKED_PRECEDENCE, false, false, false),
        }
    }

    /// Shorthand for `traits().precedence`.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        self.traits().precedence
    }
}

/// Unit a duration was entered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Seconds.
    #[default]
    Seconds,
    /// Minutes.
    Minutes,
}

impl Unit {
    /// Seconds in one of this unit.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
        }
    }
}

/// A pending motion as stored under `motions/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Motion {
    /// Procedural type.
    #[serde(rename = "type")]
    pub motion_type: MotionType,
    /// Name of the proposing member.
    pub proposer: String,
    /// Free-text detail, used by types that `has_detail`.
    pub proposal: String,
    /// Caucus duration in `caucus_unit`.
    pub caucus_duration: u32,
    /// Unit of `caucus_duration`.
    pub caucus_unit: Unit,
    /// Per-speaker duration in `speaker_unit`.
    pub speaker_duration: u32,
    /// Unit of `speaker_duration`.
    pub speaker_unit: Unit,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            motion_type: MotionType::OpenUnmoderatedCaucus,
            proposer: String::new(),
            proposal: String::new(),
            caucus_duration: 15,
            caucus_unit: Unit::Minutes,
            speaker_duration: 60,
            speaker_unit: Unit::Seconds,
        }
    }
}

impl Motion {
    /// A motion of `motion_type` with default durations.
    #[must_use]
    pub fn new(motion_type: MotionType, proposer: impl Into<String>) -> Self {
        Self {
            motion_type,
            proposer: proposer.into(),
            ..Self::default()
        }
    }

    /// Sets the caucus duration.
    #[must_use]
    pub fn with_caucus_duration(mut self, amount: u32, unit: Unit) -> Self {
        self.caucus_duration = amount;
        self.caucus_unit = unit;
        self
    }

    /// Sets the per-speaker duration.
    #[must_use]
    pub fn with_speaker_duration(mut self, amount: u32, unit: Unit) -> Self {
        self.speaker_duration = amount;
        self.speaker_unit = unit;
        self
    }

    /// Sets the free-text detail.
    #[must_use]
    pub fn with_proposal(mut self, proposal: impl Into<String>) -> Self {
        self.proposal = proposal.into();
        self
    }

    /// This motion's type traits.
    #[must_use]
    pub fn traits(&self) -> MotionTraits {
        self.motion_type.traits()
    }

    /// Caucus duration normalized to seconds.
    #[must_use]
    pub fn caucus_seconds(&self) -> u64 {
        u64::from(self.caucus_duration) * self.caucus_unit.seconds()
    }

    /// Caucus duration as a `Duration`.
    #[must_use]
    pub fn caucus_length(&self) -> Duration {
        Duration::from_secs(self.caucus_seconds())
    }

    /// Per-speaker duration as a `Duration`.
    #[must_use]
    pub fn speaker_length(&self) -> Duration {
        Duration::from_secs(u64::from(self.speaker_duration) * self.speaker_unit.seconds())
    }
}
