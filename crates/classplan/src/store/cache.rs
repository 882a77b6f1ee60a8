//! TTL-based caching of loaded snapshots.

use super::{SnapshotSource, StoreError};
use crate::engine::{CatalogSnapshot, RatingsSnapshot};
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// A cached snapshot with metadata.
#[derive(Clone)]
struct CachedSnapshot<V> {
    value: V,
    /// When this entry was cached
    cached_at: Instant,
    ttl: Duration,
}

impl<V> CachedSnapshot<V> {
    fn is_fresh(&self) -> bool {
        self.cached_at.elapsed() < self.ttl
    }
}

/// Thread-safe per-school cache.
///
/// Uses DashMap for concurrent access without external locking.
pub struct SnapshotCache<V> {
    entries: DashMap<String, CachedSnapshot<V>>,
    default_ttl: Duration,
}

impl<V: Clone> SnapshotCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// Gets a cached snapshot if it exists and hasn't expired.
    pub fn get(&self, school_id: &str) -> Option<V> {
        let entry = self.entries.get(school_id)?;
        if entry.is_fresh() {
            return Some(entry.value.clone());
        }

        // Entry expired, remove it
        drop(entry);
        self.entries.remove(school_id);
        None
    }

    pub fn insert(&self, school_id: &str, value: V) {
        self.insert_with_ttl(school_id, value, self.default_ttl);
    }

    pub fn insert_with_ttl(&self, school_id: &str, value: V, ttl: Duration) {
        self.entries.insert(
            school_id.to_string(),
            CachedSnapshot {
                value,
                cached_at: Instant::now(),
                ttl,
            },
        );
    }

    pub fn invalidate(&self, school_id: &str) {
        self.entries.remove(school_id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes expired entries from the cache.
    pub fn cleanup_expired(&self) {
        self.entries.retain(|_, entry| entry.is_fresh());
    }

    pub fn stats(&self) -> CacheStats {
        let mut total = 0;
        let mut expired = 0;

        for entry in self.entries.iter() {
            total += 1;
            if !entry.is_fresh() {
                expired += 1;
            }
        }

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

impl std::ops::Add for CacheStats {
    type Output = CacheStats;

    fn add(self, other: CacheStats) -> CacheStats {
        CacheStats {
            total_entries: self.total_entries + other.total_entries,
            expired_entries: self.expired_entries + other.expired_entries,
            active_entries: self.active_entries + other.active_entries,
        }
    }
}

/// Wraps a source so repeated loads for a school skip the backing store.
///
/// Only successful loads are cached.
pub struct CachedSource<S> {
    inner: S,
    catalogs: SnapshotCache<CatalogSnapshot>,
    ratings: SnapshotCache<RatingsSnapshot>,
}

impl<S: SnapshotSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            catalogs: SnapshotCache::new(ttl),
            ratings: SnapshotCache::new(ttl),
        }
    }

    /// Creates a cache with a 5-minute TTL.
    pub fn with_default_ttl(inner: S) -> Self {
        Self::new(inner, Duration::from_secs(5 * 60))
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops both cached snapshots for a school.
    pub fn invalidate(&self, school_id: &str) {
        self.catalogs.invalidate(school_id);
        self.ratings.invalidate(school_id);
    }

    pub fn clear(&self) {
        self.catalogs.clear();
        self.ratings.clear();
    }

    /// Combined statistics over catalog and ratings entries.
    pub fn stats(&self) -> CacheStats {
        self.catalogs.stats() + self.ratings.stats()
    }

    pub fn cleanup_expired(&self) {
        self.catalogs.cleanup_expired();
        self.ratings.cleanup_expired();
    }
}

impl<S: SnapshotSource> SnapshotSource for CachedSource<S> {
    fn latest_catalog(&self, school_id: &str) -> Result<CatalogSnapshot, StoreError> {
        if let Some(cached) = self.catalogs.get(school_id) {
            debug!(school_id = %school_id, "Catalog cache hit");
            return Ok(cached);
        }

        let snapshot = self.inner.latest_catalog(school_id)?;
        self.catalogs.insert(school_id, snapshot.clone());
        Ok(snapshot)
    }

    fn latest_ratings(&self, school_id: &str) -> Result<RatingsSnapshot, StoreError> {
        if let Some(cached) = self.ratings.get(school_id) {
            debug!(school_id = %school_id, "Ratings cache hit");
            return Ok(cached);
        }

        let snapshot = self.inner.latest_ratings(school_id)?;
        self.ratings.insert(school_id, snapshot.clone());
        Ok(snapshot)
    }
}
