//! SQLite trip store

use super::{normalize_user_id, StoredTrip, TripStore};
use crate::error::{Result, WanderlustError};
use crate::planner::TripResult;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Trip store backed by a SQLite file
#[derive(Debug, Clone)]
pub struct SqliteTripStore {
    db_path: PathBuf,
}

fn storage_err(e: impl std::fmt::Display) -> anyhow::Error {
    WanderlustError::Storage(format!("{:#}", e)).into()
}

impl SqliteTripStore {
    /// Open the store in the user's data directory
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::Storage` if the data directory cannot be
    /// determined or created
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "wanderlust", "wanderlust")
            .ok_or_else(|| WanderlustError::Storage("Could not determine data directory".into()))?;

        Self::new_with_path(proj_dirs.data_dir().join("trips.db"))
    }

    /// Open the store at a specific database path
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::storage::SqliteTripStore;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = SqliteTripStore::new_with_path(dir.path().join("trips.db")).unwrap();
    /// assert!(store.db_path().ends_with("trips.db"));
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(storage_err)?;
        }

        let store = Self { db_path };
        store.init()?;
        Ok(store)
    }

    /// Path of the database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn init(&self) -> Result<()> {
        let conn = open(&self.db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS trips (
                user_id TEXT NOT NULL,
                trip_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                data JSON NOT NULL,
                PRIMARY KEY (user_id, trip_id)
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(storage_err)?;
        Ok(())
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T> + Send + 'static,
    {
        let path = self.db_path.clone();
        tokio::task::spawn_blocking(move || op(&path))
            .await
            .map_err(storage_err)?
    }
}

fn open(path: &Path) -> Result<Connection> {
    Connection::open(path)
        .context("Failed to open database")
        .map_err(storage_err)
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn fetch_all(path: &Path, user_id: &str) -> Result<Vec<StoredTrip>> {
    let conn = open(path)?;
    let mut stmt = conn
        .prepare(
            "SELECT created_at, updated_at, data FROM trips
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC",
        )
        .context("Failed to prepare statement")
        .map_err(storage_err)?;

    let rows = stmt
        .query_map(params![user_id], |row| {
            let created_at: String = row.get(0)?;
            let updated_at: String = row.get(1)?;
            let data: String = row.get(2)?;
            Ok((created_at, updated_at, data))
        })
        .context("Failed to query trips")
        .map_err(storage_err)?;

    let mut trips = Vec::new();
    for row in rows {
        let (created_at, updated_at, data) = row.map_err(storage_err)?;
        let trip: TripResult = serde_json::from_str(&data)
            .context("Failed to deserialize trip")
            .map_err(storage_err)?;
        trips.push(StoredTrip {
            trip,
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        });
    }
    Ok(trips)
}

fn upsert(path: &Path, user_id: &str, trip: TripResult) -> Result<StoredTrip> {
    let mut conn = open(path)?;
    let data = serde_json::to_string(&trip)
        .context("Failed to serialize trip")
        .map_err(storage_err)?;
    let now = Utc::now();

    let tx = conn
        .transaction()
        .context("Failed to start transaction")
        .map_err(storage_err)?;

    let existing: Option<String> = tx
        .query_row(
            "SELECT created_at FROM trips WHERE user_id = ? AND trip_id = ?",
            params![user_id, trip.trip_id],
            |row| row.get(0),
        )
        .optional()
        .context("Failed to look up trip")
        .map_err(storage_err)?;

    let created_at = match existing {
        Some(created) => {
            tx.execute(
                "UPDATE trips SET updated_at = ?, data = ? WHERE user_id = ? AND trip_id = ?",
                params![timestamp(now), data, user_id, trip.trip_id],
            )
            .context("Failed to update trip")
            .map_err(storage_err)?;
            parse_timestamp(&created)
        }
        None => {
            tx.execute(
                "INSERT INTO trips (user_id, trip_id, created_at, updated_at, data)
                VALUES (?, ?, ?, ?, ?)",
                params![user_id, trip.trip_id, timestamp(now), timestamp(now), data],
            )
            .context("Failed to insert trip")
            .map_err(storage_err)?;
            now
        }
    };

    tx.commit()
        .context("Failed to commit transaction")
        .map_err(storage_err)?;

    Ok(StoredTrip {
        trip,
        created_at,
        updated_at: now,
    })
}

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn fetch_trips(&self, user_id: &str) -> Result<Vec<StoredTrip>> {
        let user_id = normalize_user_id(user_id);
        self.blocking(move |path| fetch_all(path, &user_id)).await
    }

    async fn save_trip(&self, user_id: &str, trip: &TripResult) -> Result<StoredTrip> {
        let user_id = normalize_user_id(user_id);
        let mut trip = trip.clone();
        trip.mark_saved();
        tracing::debug!("Saving trip {} for {}", trip.trip_id, user_id);
        self.blocking(move |path| upsert(path, &user_id, trip)).await
    }

    async fn get_trip(&self, user_id: &str, trip_id: &str) -> Result<Option<StoredTrip>> {
        let user_id = normalize_user_id(user_id);
        let trip_id = trip_id.to_string();
        self.blocking(move |path| {
            let conn = open(path)?;
            let row: Option<(String, String, String)> = conn
                .query_row(
                    "SELECT created_at, updated_at, data FROM trips
                    WHERE user_id = ? AND trip_id = ?",
                    params![user_id, trip_id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .optional()
                .context("Failed to query trip")
                .map_err(storage_err)?;

            row.map(|(created_at, updated_at, data)| {
                let trip: TripResult = serde_json::from_str(&data)
                    .context("Failed to deserialize trip")
                    .map_err(storage_err)?;
                Ok(StoredTrip {
                    trip,
                    created_at: parse_timestamp(&created_at),
                    updated_at: parse_timestamp(&updated_at),
                })
            })
            .transpose()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{OptionKind, TransportOption, TripStatus};
    use tempfile::tempdir;

    fn create_test_store() -> (SqliteTripStore, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let store =
            SqliteTripStore::new_with_path(dir.path().join("trips.db")).expect("failed to create store");
        (store, dir)
    }

    fn trip(id: &str) -> TripResult {
        TripResult {
            trip_id: id.to_string(),
            destination: "Goa, India".to_string(),
            currency: "INR".to_string(),
            people: 2,
            ..TripResult::default()
        }
    }

    #[test]
    fn test_init_creates_table() {
        let (store, _dir) = create_test_store();
        let conn = Connection::open(store.db_path()).expect("open connection");
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='trips'",
                [],
                |r| r.get(0),
            )
            .expect("query row");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_save_and_fetch_round_trip() {
        let (store, _dir) = create_test_store();
        let stored = store.save_trip("Ana@Example.com", &trip("t-1")).await.unwrap();
        assert_eq!(stored.status(), TripStatus::Saved);

        let trips = store.fetch_trips("ana@example.com").await.unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].trip.destination, "Goa, India");
        assert_eq!(trips[0].trip.status, TripStatus::Saved);
    }

    #[tokio::test]
    async fn test_upsert_keeps_creation_time() {
        let (store, _dir) = create_test_store();
        let first = store.save_trip("ana", &trip("t-1")).await.unwrap();

        let mut booked = trip("t-1");
        booked.transport_options.push(TransportOption {
            id: "t1".to_string(),
            ..TransportOption::default()
        });
        booked.book_option(OptionKind::Transport, "t1").unwrap();
        let second = store.save_trip("ana", &booked).await.unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.status(), TripStatus::Booked);

        let trips = store.fetch_trips("ana").await.unwrap();
        assert_eq!(trips.len(), 1);
        assert!(trips[0].trip.transport_options[0].booked);
    }

    #[tokio::test]
    async fn test_fetch_orders_newest_first() {
        let (store, _dir) = create_test_store();
        store.save_trip("ana", &trip("older")).await.unwrap();
        store.save_trip("ana", &trip("newer")).await.unwrap();
        store.save_trip("bob", &trip("other")).await.unwrap();

        let ids: Vec<String> = store
            .fetch_trips("ana")
            .await
            .unwrap()
            .iter()
            .map(|s| s.id().to_string())
            .collect();
        assert_eq!(ids, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_get_trip() {
        let (store, _dir) = create_test_store();
        store.save_trip("ana", &trip("t-1")).await.unwrap();
        assert!(store.get_trip(" ANA ", "t-1").await.unwrap().is_some());
        assert!(store.get_trip("ana", "t-2").await.unwrap().is_none());
        assert!(store.get_trip("bob", "t-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reopen_sees_saved_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("trips.db");
        {
            let store = SqliteTripStore::new_with_path(path.clone()).unwrap();
            store.save_trip("ana", &trip("t-1")).await.unwrap();
        }
        let store = SqliteTripStore::new_with_path(path.clone()).unwrap();
        assert_eq!(store.fetch_trips("ana").await.unwrap().len(), 1);
    }
}
