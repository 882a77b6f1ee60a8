/// Shared application state
use crate::engine::ScheduleEngine;
use crate::store::{CacheStats, CachedSource, SnapshotSource};
use std::sync::Arc;
use std::time::Duration;

/// State handed to every request handler.
pub struct AppState {
    /// Where catalog and rating snapshots come from
    pub source: Arc<dyn SnapshotSource>,
    /// Management handle for `source` when it is cached
    pub cache: Option<Arc<dyn CacheControl>>,
    pub engine: ScheduleEngine,
}

impl AppState {
    /// Serves snapshots from `source` through a TTL cache.
    pub fn cached<S: SnapshotSource + 'static>(
        source: S,
        ttl: Duration,
        engine: ScheduleEngine,
    ) -> Self {
        let cached = Arc::new(CachedSource::new(source, ttl));
        Self {
            source: cached.clone(),
            cache: Some(cached),
            engine,
        }
    }

    /// Loads from `source` on every request.
    pub fn uncached<S: SnapshotSource + 'static>(source: S, engine: ScheduleEngine) -> Self {
        Self {
            source: Arc::new(source),
            cache: None,
            engine,
        }
    }
}

/// Management operations on a cached source.
pub trait CacheControl: Send + Sync {
    fn stats(&self) -> CacheStats;
    fn clear(&self);
    fn invalidate(&self, school_id: &str);
    fn cleanup_expired(&self);
}

impl<S: SnapshotSource> CacheControl for CachedSource<S> {
    fn stats(&self) -> CacheStats {
        CachedSource::stats(self)
    }

    fn clear(&self) {
        CachedSource::clear(self)
    }

    fn invalidate(&self, school_id: &str) {
        CachedSource::invalidate(self, school_id)
    }

    fn cleanup_expired(&self) {
        CachedSource::cleanup_expired(self)
    }
}
