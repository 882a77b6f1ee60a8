/// Tunables for the schedule engine
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of schedules returned.
pub const DEFAULT_TOP_K: usize = 10;

/// Default minimum similarity for an instructor to match a rating record.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.90;

/// How sections without a matched rating count toward a schedule's score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum UnknownRatingPolicy {
    /// Add the -1 placeholder like any other rating
    #[default]
    SumAsIs,
    /// Unrated sections contribute nothing
    Ignore,
    /// Unrated sections contribute `value`
    Substitute { value: f32 },
    /// Schedules containing an unrated section are not ranked at all
    Exclude,
}

impl UnknownRatingPolicy {
    /// The amount an unrated section adds to a score, or `None` if the
    /// schedule must be dropped.
    pub fn contribution(&self, sentinel: f32) -> Option<f32> {
        match self {
            UnknownRatingPolicy::SumAsIs => Some(sentinel),
            UnknownRatingPolicy::Ignore => Some(0.0),
            UnknownRatingPolicy::Substitute { value } => Some(*value),
            UnknownRatingPolicy::Exclude => None,
        }
    }
}

/// Limits on the combination search. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchBudget {
    /// Maximum partial or complete selections visited
    #[serde(default)]
    pub max_candidates: Option<u64>,
    /// Wall-clock limit in milliseconds
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
}

impl SearchBudget {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_candidates(mut self, max: u64) -> Self {
        self.max_candidates = Some(max);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = Some(limit.as_millis() as u64);
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

/// Engine configuration. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    #[serde(default)]
    pub unknown_rating: UnknownRatingPolicy,
    #[serde(default)]
    pub search_budget: SearchBudget,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_match_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            unknown_rating: UnknownRatingPolicy::default(),
            search_budget: SearchBudget::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.top_k, 10);
        assert_eq!(config.unknown_rating, UnknownRatingPolicy::SumAsIs);
    }

    #[test]
    fn test_policy_json() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"unknown_rating": {"policy": "substitute", "value": 2.5},
                "search_budget": {"max_candidates": 1000}}"#,
        )
        .unwrap();
        assert_eq!(
            config.unknown_rating,
            UnknownRatingPolicy::Substitute { value: 2.5 }
        );
        assert_eq!(config.search_budget.max_candidates, Some(1000));
        assert_eq!(config.search_budget.time_limit(), None);
    }

    #[test]
    fn test_policy_contribution() {
        assert_eq!(UnknownRatingPolicy::SumAsIs.contribution(-1.0), Some(-1.0));
        assert_eq!(UnknownRatingPolicy::Ignore.contribution(-1.0), Some(0.0));
        assert_eq!(UnknownRatingPolicy::Exclude.contribution(-1.0), None);
    }
}
