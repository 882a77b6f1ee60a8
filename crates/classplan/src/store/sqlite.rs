/// SQLite-backed snapshot storage
use super::{SnapshotKind, SnapshotSource, StoreError};
use crate::engine::{CatalogSnapshot, RatingsSnapshot};
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const SCHEMA_SQL: &str = include_str!("../../../../sql/init_snapshots.sql");

pub struct SqliteSnapshotStore {
    db: Mutex<Connection>,
}

impl SqliteSnapshotStore {
    /// Opens (or creates) the database at `db_path` and applies the schema
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(db_path)?)
    }

    /// A private database that lives as long as the store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Stores a new catalog snapshot, which becomes the latest for its school
    pub fn insert_catalog(&self, snapshot: &CatalogSnapshot) -> Result<i64, StoreError> {
        self.insert(
            SnapshotKind::Catalog,
            &snapshot.school,
            snapshot.timestamp,
            snapshot,
        )
    }

    /// Stores a new ratings snapshot, which becomes the latest for its school
    pub fn insert_ratings(&self, snapshot: &RatingsSnapshot) -> Result<i64, StoreError> {
        self.insert(
            SnapshotKind::Ratings,
            &snapshot.school_id,
            snapshot.timestamp,
            snapshot,
        )
    }

    fn insert<T: Serialize>(
        &self,
        kind: SnapshotKind,
        school_id: &str,
        timestamp: i64,
        snapshot: &T,
    ) -> Result<i64, StoreError> {
        let payload = serde_json::to_string(snapshot)?;
        let captured_at = if timestamp > 0 {
            timestamp
        } else {
            chrono::Utc::now().timestamp()
        };

        let db = self.lock()?;
        db.execute(
            "INSERT INTO snapshots (school_id, kind, captured_at, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, datetime('now'))",
            (school_id, kind.as_str(), captured_at, payload),
        )?;
        let id = db.last_insert_rowid();

        debug!(school_id = %school_id, kind = %kind, snapshot_id = id, "Stored snapshot");
        Ok(id)
    }

    fn latest<T: DeserializeOwned>(
        &self,
        kind: SnapshotKind,
        school_id: &str,
    ) -> Result<T, StoreError> {
        let db = self.lock()?;
        let payload: Option<String> = db
            .query_row(
                "SELECT payload FROM snapshots
                 WHERE school_id = ?1 AND kind = ?2
                 ORDER BY snapshot_id DESC
                 LIMIT 1",
                (school_id, kind.as_str()),
                |row| row.get(0),
            )
            .optional()?;
        drop(db);

        let payload = payload.ok_or_else(|| StoreError::NotFound {
            kind,
            school_id: school_id.to_string(),
        })?;

        Ok(serde_json::from_str(&payload)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.db.lock().map_err(|_| StoreError::Connection {
            message: "database lock poisoned".to_string(),
        })
    }
}

impl SnapshotSource for SqliteSnapshotStore {
    fn latest_catalog(&self, school_id: &str) -> Result<CatalogSnapshot, StoreError> {
        self.latest(SnapshotKind::Catalog, school_id)
    }

    fn latest_ratings(&self, school_id: &str) -> Result<RatingsSnapshot, StoreError> {
        self.latest(SnapshotKind::Ratings, school_id)
    }
}
