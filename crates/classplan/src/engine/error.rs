//! Error types for the schedule engine.

use super::types::Combination;
use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur while building schedules.
#[derive(Debug, Error, Clone)]
pub enum ScheduleError {
    /// Catalog or ratings could not be loaded; no partial result exists
    #[error("Data unavailable: {0}")]
    DataUnavailable(#[from] StoreError),

    /// A rating's numeric text was malformed. Recovered by the integrator.
    #[error("Could not parse rating {value:?}: {message}")]
    ParseFailure { value: String, message: String },

    /// Enumeration stopped early; `partial` is the ranked top-K found so far
    #[error("Search budget exceeded after {examined} candidates ({found} valid so far)")]
    SearchBudgetExceeded {
        examined: u64,
        found: usize,
        partial: Vec<Combination>,
    },
}

impl ScheduleError {
    /// Returns true if the requested school has no stored snapshot.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScheduleError::DataUnavailable(e) if e.is_not_found())
    }

    /// Returns true if retrying the same request could succeed.
    ///
    /// Budget exhaustion is deterministic for a candidate cap, so only
    /// transport failures qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScheduleError::DataUnavailable(e) if e.is_retryable())
    }
}
