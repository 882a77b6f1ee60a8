//! Loading of catalog and rating snapshots.

mod cache;
mod sqlite;

pub use cache::{CacheStats, CachedSource, SnapshotCache};
pub use sqlite::SqliteSnapshotStore;

use crate::engine::{CatalogSnapshot, RatingsSnapshot};
use thiserror::Error;

/// Which of the two per-school documents a load refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    Catalog,
    Ratings,
}

impl SnapshotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKind::Catalog => "catalog",
            SnapshotKind::Ratings => "ratings",
        }
    }
}

impl std::fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while loading snapshots.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// Nothing stored for this school
    #[error("No {kind} snapshot found for school {school_id}")]
    NotFound {
        kind: SnapshotKind,
        school_id: String,
    },

    /// The backing store could not be reached or queried
    #[error("Store connection error: {message}")]
    Connection { message: String },

    /// A stored payload is not a valid snapshot document
    #[error("Could not decode stored snapshot: {message}")]
    Decode { message: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Returns true if this error is potentially transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Connection { .. })
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Connection {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode {
            message: err.to_string(),
        }
    }
}

/// Provides the most recent snapshots for an institution.
pub trait SnapshotSource: Send + Sync {
    fn latest_catalog(&self, school_id: &str) -> Result<CatalogSnapshot, StoreError>;

    fn latest_ratings(&self, school_id: &str) -> Result<RatingsSnapshot, StoreError>;
}
