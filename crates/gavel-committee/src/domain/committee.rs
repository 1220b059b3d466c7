//! The committee aggregate: everything a client renders from one snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::attendance::AttendanceStats;
use super::caucus::Caucus;
use super::lenient;
use super::motion::Motion;
use super::participant::Participant;
use super::ranking::{MotionId, next_motion};

/// A committee as stored under `committees/{id}`.
///
/// Decoded from a single snapshot and never mutated in place; commands go
/// through the store and arrive back as a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Committee {
    /// Committee name.
    pub name: String,
    /// Agenda topic.
    pub topic: String,
    /// Roster keyed by member id.
    #[serde(deserialize_with = "lenient::children")]
    pub members: BTreeMap<String, Participant>,
    /// Pending motions keyed by motion id.
    #[serde(deserialize_with = "lenient::children")]
    pub motions: BTreeMap<MotionId, Motion>,
    /// Caucuses keyed by caucus id.
    #[serde(deserialize_with = "lenient::children")]
    pub caucuses: BTreeMap<String, Caucus>,
}

/// How often one member has held the floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerTally {
    /// Member id.
    pub member_id: String,
    /// Member name.
    pub name: String,
    /// Number of history entries naming this member, across all caucuses.
    pub times_spoken: usize,
}

impl Committee {
    /// An empty committee.
    #[must_use]
    pub fn new(name: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            topic: topic.into(),
            ..Self::default()
        }
    }

    /// Decodes a committee snapshot, degrading malformed parts to defaults.
    #[must_use]
    pub fn from_snapshot(snapshot: &Value) -> Self {
        lenient::decode_or_default(snapshot, "committee")
    }

    /// Quorum and thresholds for the current roster.
    #[must_use]
    pub fn attendance(&self) -> AttendanceStats {
        AttendanceStats::from_participants(self.members.values())
    }

    /// The motion to act on next, if any are pending.
    #[must_use]
    pub fn next_motion(&self) -> Option<(&MotionId, &Motion)> {
        next_motion(&self.motions)
    }

    /// Times each member has spoken, most frequent first. Members with equal
    /// counts keep roster order.
    ///
    /// History entries record names, not member ids, so a renamed member
    /// loses the turns taken under the old name.
    #[must_use]
    pub fn speaker_stats(&self) -> Vec<SpeakerTally> {
        let mut spoken: BTreeMap<&str, usize> = BTreeMap::new();
        for event in self.caucuses.values().flat_map(|c| c.history.values()) {
            *spoken.entry(event.who.as_str()).or_default() += 1;
        }

        let mut tallies: Vec<SpeakerTally> = self
            .members
            .iter()
            .map(|(member_id, member)| SpeakerTally {
                member_id: member_id.clone(),
                name: member.name.clone(),
                times_spoken: spoken.get(member.name.as_str()).copied().unwrap_or(0),
            })
            .collect();
        tallies.sort_by(|a, b| b.times_spoken.cmp(&a.times_spoken));
        tallies
    }
}
