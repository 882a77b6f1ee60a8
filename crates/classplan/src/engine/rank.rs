//! Scoring and ordering of valid combinations.

use super::config::UnknownRatingPolicy;
use super::types::{Combination, UNKNOWN_RATING};

/// Re-scores combinations under `policy`, dropping any it excludes.
///
/// Member sections keep their placeholder rating; only the score changes.
pub fn apply_unknown_policy(
    combinations: Vec<Combination>,
    policy: UnknownRatingPolicy,
) -> Vec<Combination> {
    if policy == UnknownRatingPolicy::SumAsIs {
        return combinations;
    }

    combinations
        .into_iter()
        .filter_map(|mut combination| {
            combination.score = score_under(&combination, policy)?;
            Some(combination)
        })
        .collect()
}

fn score_under(combination: &Combination, policy: UnknownRatingPolicy) -> Option<f32> {
    let unknown = policy.contribution(UNKNOWN_RATING);
    combination.sections.iter().try_fold(0.0f32, |total, s| {
        if s.has_known_rating() {
            Some(total + s.instructor_rating)
        } else {
            unknown.map(|value| total + value)
        }
    })
}

/// Orders by descending score and keeps the first `k`.
///
/// The sort is stable: equal scores stay in enumeration order.
pub fn rank(mut combinations: Vec<Combination>, k: usize) -> Vec<Combination> {
    combinations.sort_by(|a, b| b.score.total_cmp(&a.score));
    combinations.truncate(k);
    combinations
}
