//! Committee members.

use serde::{Deserialize, Serialize};

/// Standing of a member in the committee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// A regular voting member.
    #[default]
    Standard,
    /// A voting member with veto power.
    Veto,
    /// A non-governmental organization; never votes.
    #[serde(rename = "NGO")]
    Ngo,
    /// An observer; never votes.
    Observer,
}

impl Rank {
    /// Whether members of this rank may ever vote.
    #[must_use]
    pub fn is_voting_rank(self) -> bool {
        matches!(self, Self::Standard | Self::Veto)
    }
}

/// A committee member as stored under `members/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    /// Display name, usually a country label. Unique within a committee.
    pub name: String,
    /// Standing in the committee.
    pub rank: Rank,
    /// Whether the member answered roll call.
    pub present: bool,
    /// Whether the member declared voting rights.
    pub voting: bool,
}

impl Participant {
    /// A present, voting, standard-rank member.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rank: Rank::Standard,
            present: true,
            voting: true,
        }
    }

    /// Whether this member counts towards voting thresholds right now.
    #[must_use]
    pub fn can_vote(&self) -> bool {
        self.present && self.voting && self.rank.is_voting_rank()
    }
}
