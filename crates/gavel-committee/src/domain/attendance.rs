//! Quorum and voting thresholds derived from the roster.

use serde::Serialize;

use super::participant::Participant;

/// Attendance figures for one roster snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceStats {
    /// Members on the roster.
    pub delegates_count: usize,
    /// Members present.
    pub present_count: usize,
    /// Present members with voting rights and a voting rank.
    pub voting_count: usize,
    /// Members needed for debate: half the roster, rounded up.
    pub quorum: usize,
    /// Whether enough members are present for debate.
    pub has_quorum: bool,
    /// Sponsors needed to table a draft resolution: a quarter of voters.
    pub draft_resolution_threshold: usize,
    /// Sponsors needed to table an amendment: a tenth of voters.
    pub amendment_threshold: usize,
}

impl AttendanceStats {
    /// Computes attendance over `participants`.
    pub fn from_participants<'a, I>(participants: I) -> Self
    where
        I: IntoIterator<Item = &'a Participant>,
    {
        let mut delegates_count: usize = 0;
        let mut present_count: usize = 0;
        let mut voting_count: usize = 0;
        for participant in participants {
            delegates_count += 1;
            if participant.present {
                present_count += 1;
            }
            if participant.can_vote() {
                voting_count += 1;
            }
        }

        let quorum = delegates_count.div_ceil(2);
        Self {
            delegates_count,
            present_count,
            voting_count,
            quorum,
            has_quorum: present_count >= quorum,
            draft_resolution_threshold: voting_count.div_ceil(4),
            amendment_threshold: voting_count.div_ceil(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::participant::Rank;

    fn roster(total: usize, present: usize) -> Vec<Participant> {
        (0..total)
            .map(|i| Participant {
                present: i < present,
                ..Participant::new(format!("Member {i}"))
            })
            .collect()
    }

    #[test]
    fn test_quorum_met_with_six_of_ten_present() {
        let stats = AttendanceStats::from_participants(&roster(10, 6));

        assert_eq!(stats.delegates_count, 10);
        assert_eq!(stats.present_count, 6);
        assert_eq!(stats.quorum, 5);
        assert!(stats.has_quorum);
    }

    #[test]
    fn test_quorum_not_met_with_four_of_ten_present() {
        let stats = AttendanceStats::from_participants(&roster(10, 4));
        assert_eq!(stats.quorum, 5);
        assert!(!stats.has_quorum);
    }

    #[test]
    fn test_quorum_rounds_up_for_odd_roster() {
        let stats = AttendanceStats::from_participants(&roster(7, 3));
        assert_eq!(stats.quorum, 4);
        assert!(!stats.has_quorum);
    }

    #[test]
    fn test_thresholds_for_eight_voters() {
        let stats = AttendanceStats::from_participants(&roster(8, 8));

        assert_eq!(stats.voting_count, 8);
        assert_eq!(stats.draft_resolution_threshold, 2);
        assert_eq!(stats.amendment_threshold, 1);
    }

    #[test]
    fn test_voting_count_excludes_absent_and_non_voting_ranks() {
        // Arrange
        let members = vec![
            Participant::new("France"),
            Participant { rank: Rank::Veto, ..Participant::new("China") },
            Participant { rank: Rank::Observer, ..Participant::new("Holy See") },
            Participant { rank: Rank::Ngo, ..Participant::new("Red Cross") },
            Participant { present: false, ..Participant::new("Chad") },
            Participant { voting: false, ..Participant::new("Peru") },
        ];

        // Act
        let stats = AttendanceStats::from_participants(&members);

        // Assert
        assert_eq!(stats.delegates_count, 6);
        assert_eq!(stats.present_count, 5);
        assert_eq!(stats.voting_count, 2);
        assert_eq!(stats.draft_resolution_threshold, 1);
        assert_eq!(stats.amendment_threshold, 1);
    }

    #[test]
    fn test_empty_roster_has_trivial_quorum() {
        let stats = AttendanceStats::from_participants(&Vec::<Participant>::new());
        assert_eq!(stats.quorum, 0);
        assert!(stats.has_quorum);
        assert_eq!(stats.draft_resolution_threshold, 0);
    }
}
