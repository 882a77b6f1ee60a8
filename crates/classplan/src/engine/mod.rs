/// Schedule construction: filter, rate, enumerate, rank
mod config;
mod error;
pub mod enumerate;
pub mod filter;
pub mod rank;
pub mod ratings;
pub mod similarity;
mod types;

pub use config::*;
pub use error::ScheduleError;
pub use types::*;

use crate::store::SnapshotSource;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Ranked schedules plus counts from each stage.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOutcome {
    pub schedules: Vec<Combination>,
    pub stats: PipelineStats,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    /// Sections left after course selection and eligibility checks
    pub eligible_sections: usize,
    /// Eligible sections whose instructor matched a rating
    pub rated_sections: usize,
    /// Partial and complete selections visited by the search
    pub candidates_examined: u64,
    /// Conflict-free combinations admitted to ranking
    pub valid_combinations: usize,
}

/// Builds ranked schedules with a fixed configuration.
///
/// Holds no mutable state; one engine can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ScheduleEngine {
    config: EngineConfig,
}

impl ScheduleEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the full pipeline over in-memory inputs.
    ///
    /// # Returns
    /// * `Ok(ScheduleOutcome)` - Up to `top_k` schedules, best first; empty when
    ///   nothing fits
    /// * `Err(ScheduleError::SearchBudgetExceeded)` - The search budget ran out;
    ///   the error carries the ranked top-K of what was found
    pub fn build(
        &self,
        catalog: &[Section],
        ratings: &[RatingRecord],
        constraints: &Constraints,
        top_k: usize,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        let start = Instant::now();

        let eligible = filter::filter_sections(catalog, constraints);
        let rated = ratings::attach_ratings(&eligible, ratings, self.config.match_threshold);
        let rated_sections = rated.iter().filter(|s| s.has_known_rating()).count();

        info!(
            catalog = catalog.len(),
            eligible = eligible.len(),
            rated = rated_sections,
            "Prepared sections for enumeration"
        );

        let enumeration = match enumerate::enumerate_within(&rated, self.config.search_budget) {
            Ok(enumeration) => enumeration,
            Err(exhausted) => {
                let found = exhausted.found.len();
                let partial = self.rank_found(exhausted.found, top_k);
                warn!(
                    examined = exhausted.examined,
                    found,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Search budget exceeded"
                );
                return Err(ScheduleError::SearchBudgetExceeded {
                    examined: exhausted.examined,
                    found,
                    partial,
                });
            }
        };

        let admitted =
            rank::apply_unknown_policy(enumeration.combinations, self.config.unknown_rating);
        let valid_combinations = admitted.len();
        let schedules = rank::rank(admitted, top_k);

        info!(
            examined = enumeration.examined,
            valid = valid_combinations,
            returned = schedules.len(),
            best = ?schedules.first().map(Combination::class_ids),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Built schedules"
        );

        Ok(ScheduleOutcome {
            schedules,
            stats: PipelineStats {
                eligible_sections: eligible.len(),
                rated_sections,
                candidates_examined: enumeration.examined,
                valid_combinations,
            },
        })
    }

    /// Loads the latest snapshots for `school_id` and runs the pipeline.
    ///
    /// Load failures end the request as `DataUnavailable`; nothing is
    /// computed from a partial load.
    pub fn build_for_school(
        &self,
        source: &dyn SnapshotSource,
        school_id: &str,
        constraints: &Constraints,
        top_k: usize,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        info!(school_id = %school_id, courses = ?constraints.courses, "Building schedules");

        let catalog = source.latest_catalog(school_id)?;
        let ratings = source.latest_ratings(school_id)?;

        self.build(&catalog.classes, &ratings.professors, constraints, top_k)
    }

    fn rank_found(&self, found: Vec<Combination>, top_k: usize) -> Vec<Combination> {
        rank::rank(
            rank::apply_unknown_policy(found, self.config.unknown_rating),
            top_k,
        )
    }
}

/// Top `top_k` conflict-free schedules for `constraints`, best first.
///
/// Uses the default configuration: ratings match above 0.90 similarity,
/// unmatched instructors count as -1 and the search is unbounded.
pub fn build_schedules(
    catalog: &[Section],
    ratings: &[RatingRecord],
    constraints: &Constraints,
    top_k: usize,
) -> Vec<Combination> {
    match ScheduleEngine::default().build(catalog, ratings, constraints, top_k) {
        Ok(outcome) => outcome.schedules,
        // Unreachable with an unbounded budget
        Err(ScheduleError::SearchBudgetExceeded { partial, .. }) => partial,
        // In-memory inputs are never loaded or parsed here
        Err(ScheduleError::DataUnavailable(_)) | Err(ScheduleError::ParseFailure { .. }) => {
            Vec::new()
        }
    }
}
