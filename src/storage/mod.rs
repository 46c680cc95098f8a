//! Trip persistence
//!
//! [`TripStore`] is the explicit persistence interface. Callers hold a store
//! and pass it where trips are read or saved; there is no global instance.
//! Trips are keyed by normalized user id and trip id.

pub mod memory;
pub mod sqlite;
pub mod types;

pub use memory::MemoryTripStore;
pub use sqlite::SqliteTripStore;
pub use types::StoredTrip;

use crate::config::StorageConfig;
use crate::error::{Result, WanderlustError};
use crate::planner::TripResult;
use async_trait::async_trait;

/// Normalize a user id for keying: trimmed and lowercased
///
/// # Examples
///
/// ```
/// use wanderlust::storage::normalize_user_id;
///
/// assert_eq!(normalize_user_id("  Ana@Example.com "), "ana@example.com");
/// ```
pub fn normalize_user_id(user_id: &str) -> String {
    user_id.trim().to_lowercase()
}

/// Persistence backend for trip plans
#[async_trait]
pub trait TripStore: Send + Sync {
    /// All trips of a user, most recently created first
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::Storage` if the backend fails
    async fn fetch_trips(&self, user_id: &str) -> Result<Vec<StoredTrip>>;

    /// Insert or replace a trip by id
    ///
    /// A draft is stored as saved; booked trips keep their status. The
    /// original creation time is preserved on update. Returns the trip as
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::Storage` if the backend fails
    async fn save_trip(&self, user_id: &str, trip: &TripResult) -> Result<StoredTrip>;

    /// One trip of a user, if present
    async fn get_trip(&self, user_id: &str, trip_id: &str) -> Result<Option<StoredTrip>> {
        Ok(self
            .fetch_trips(user_id)
            .await?
            .into_iter()
            .find(|stored| stored.trip.trip_id == trip_id))
    }

    /// One trip of a user
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::TripNotFound` if the user has no such trip
    async fn require_trip(&self, user_id: &str, trip_id: &str) -> Result<StoredTrip> {
        self.get_trip(user_id, trip_id)
            .await?
            .ok_or_else(|| WanderlustError::TripNotFound(trip_id.to_string()).into())
    }
}

/// Open the SQLite store at the configured path or the default location
///
/// # Errors
///
/// Returns `WanderlustError::Storage` if the database cannot be opened
pub fn open_store(config: &StorageConfig) -> Result<SqliteTripStore> {
    match &config.db_path {
        Some(path) => SqliteTripStore::new_with_path(path),
        None => SqliteTripStore::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_user_id() {
        assert_eq!(normalize_user_id("Traveler"), "traveler");
        assert_eq!(normalize_user_id("\tUSER@X.IO\n"), "user@x.io");
        assert_eq!(normalize_user_id(""), "");
    }

    #[tokio::test]
    async fn test_require_trip_missing() {
        let store = MemoryTripStore::new();
        let err = store.require_trip("ana", "nope").await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<WanderlustError>(),
            Some(WanderlustError::TripNotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_open_store_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            db_path: Some(dir.path().join("trips.db").to_string_lossy().into_owned()),
        };
        assert!(open_store(&config).is_ok());
    }
}
