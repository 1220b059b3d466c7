//! Procedural ordering of pending motions.
//!
//! Motions are ordered by the precedence of their type, most urgent first.
//! Among motions of equal precedence the one asking for the longer caucus
//! goes first. Anything still tied keeps its input order: the sort is
//! stable, and the input order of a stored motion map is creation order
//! because push keys are time-ordered. Ranking the same motions twice
//! therefore never shuffles equal entries between renders.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::motion::Motion;

/// Identifier of a motion: its push key under `motions/`.
pub type MotionId = String;

/// Compares two motions by procedural urgency.
#[must_use]
pub fn compare_urgency(a: &Motion, b: &Motion) -> Ordering {
    a.motion_type
        .precedence()
        .cmp(&b.motion_type.precedence())
        .then_with(|| b.caucus_seconds().cmp(&a.caucus_seconds()))
}

/// Orders an already-materialized sequence of motions, keeping the relative
/// order of equally urgent entries.
#[must_use]
pub fn rank<I, K, M>(motions: I) -> Vec<(K, M)>
where
    I: IntoIterator<Item = (K, M)>,
    M: std::borrow::Borrow<Motion>,
{
    let mut ordered: Vec<(K, M)> = motions.into_iter().collect();
    ordered.sort_by(|(_, a), (_, b)| compare_urgency(a.borrow(), b.borrow()));
    ordered
}

/// Orders the stored motion map, most urgent first.
#[must_use]
pub fn rank_motions(motions: &BTreeMap<MotionId, Motion>) -> Vec<(&MotionId, &Motion)> {
    rank(motions.iter())
}

/// The motion the chair should act on next, if any.
#[must_use]
pub fn next_motion(motions: &BTreeMap<MotionId, Motion>) -> Option<(&MotionId, &Motion)> {
    motions
        .iter()
        .reduce(|best, candidate| {
            if compare_urgency(candidate.1, best.1) == Ordering::Less {
                candidate
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::motion::{MotionType, Unit};
    use proptest::prelude::*;

    fn motions(entries: Vec<(&str, Motion)>) -> BTreeMap<MotionId, Motion> {
        entries
            .into_iter()
            .map(|(id, motion)| (id.to_owned(), motion))
            .collect()
    }

    fn ids<'a>(ranked: &[(&'a MotionId, &'a Motion)]) -> Vec<&'a str> {
        ranked.iter().map(|(id, _)| id.as_str()).collect()
    }

    #[test]
    fn test_lower_precedence_sorts_first() {
        // Arrange
        let pending = motions(vec![
            (
                "m1",
                Motion::new(MotionType::OpenModeratedCaucus, "France")
                    .with_caucus_duration(10, Unit::Minutes),
            ),
            (
                "m2",
                Motion::new(MotionType::ExtendUnmoderatedCaucus, "Chad")
                    .with_caucus_duration(5, Unit::Minutes),
            ),
        ]);

        // Act
        let ranked = rank_motions(&pending);

        // Assert
        assert_eq!(ids(&ranked), ["m2", "m1"]);
    }

    #[test]
    fn test_longer_caucus_breaks_precedence_tie() {
        let pending = motions(vec![
            (
                "m1",
                Motion::new(MotionType::OpenModeratedCaucus, "France")
                    .with_caucus_duration(5, Unit::Minutes),
            ),
            (
                "m2",
                Motion::new(MotionType::OpenModeratedCaucus, "Chad")
                    .with_caucus_duration(10, Unit::Minutes),
            ),
        ]);

        let ranked = rank_motions(&pending);

        assert_eq!(ids(&ranked), ["m2", "m1"]);
    }

    #[test]
    fn test_tie_break_normalizes_units() {
        let pending = motions(vec![
            (
                "m1",
                Motion::new(MotionType::OpenUnmoderatedCaucus, "France")
                    .with_caucus_duration(90, Unit::Seconds),
            ),
            (
                "m2",
                Motion::new(MotionType::OpenUnmoderatedCaucus, "Chad")
                    .with_caucus_duration(2, Unit::Minutes),
            ),
        ]);

        assert_eq!(ids(&rank_motions(&pending)), ["m2", "m1"]);
    }

    #[test]
    fn test_full_ties_keep_creation_order() {
        let same = Motion::new(MotionType::OpenDebate, "France");
        let pending = motions(vec![
            ("m3", same.clone()),
            ("m1", Motion::new(MotionType::CloseDebate, "Chad")),
            ("m2", same),
        ]);

        assert_eq!(ids(&rank_motions(&pending)), ["m1", "m2", "m3"]);
    }

    #[test]
    fn test_unrecognized_types_sort_last() {
        let pending = motions(vec![
            (
                "m1",
                Motion {
                    motion_type: MotionType::Unrecognized,
                    ..Motion::default()
                },
            ),
            ("m2", Motion::new(MotionType::ReorderDraftResolutions, "Peru")),
        ]);

        assert_eq!(ids(&rank_motions(&pending)), ["m2", "m1"]);
    }

    #[test]
    fn test_next_motion_matches_head_of_ranking() {
        let pending = motions(vec![
            ("m1", Motion::new(MotionType::IntroduceAmendment, "Peru")),
            ("m2", Motion::new(MotionType::CloseModeratedCaucus, "Chad")),
            ("m3", Motion::new(MotionType::ExtendModeratedCaucus, "Mali")),
        ]);

        let (id, _) = next_motion(&pending).unwrap();

        assert_eq!(id, "m2");
        assert_eq!(rank_motions(&pending)[0].0, "m2");
        assert!(next_motion(&BTreeMap::new()).is_none());
    }

    fn arb_motion() -> impl Strategy<Value = Motion> {
        (
            proptest::sample::select(MotionType::ALL.to_vec()),
            0u32..30,
            prop_oneof![Just(Unit::Seconds), Just(Unit::Minutes)],
        )
            .prop_map(|(motion_type, amount, unit)| {
                Motion::new(motion_type, "Delegate").with_caucus_duration(amount, unit)
            })
    }

    proptest! {
        #[test]
        fn prop_ranking_is_idempotent_and_lossless(
            list in proptest::collection::vec(arb_motion(), 0..40),
        ) {
            let pending: BTreeMap<MotionId, Motion> = list
                .into_iter()
                .enumerate()
                .map(|(i, m)| (format!("m{i:03}"), m))
                .collect();

            let once = rank_motions(&pending);
            let twice = rank(once.iter().map(|(id, m)| (*id, *m)));

            prop_assert_eq!(once.len(), pending.len());
            prop_assert_eq!(&once, &twice);

            let mut seen: Vec<&str> = once.iter().map(|(id, _)| id.as_str()).collect();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), pending.len());
        }

        #[test]
        fn prop_ranking_is_ordered_by_urgency(
            list in proptest::collection::vec(arb_motion(), 0..40),
        ) {
            let pending: BTreeMap<MotionId, Motion> = list
                .into_iter()
                .enumerate()
                .map(|(i, m)| (format!("m{i:03}"), m))
                .collect();

            let ranked = rank_motions(&pending);
            for pair in ranked.windows(2) {
                prop_assert_ne!(compare_urgency(pair[0].1, pair[1].1), Ordering::Greater);
            }
        }
    }
}
