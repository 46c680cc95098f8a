//! In-memory trip store

use super::{normalize_user_id, StoredTrip, TripStore};
use crate::error::{Result, WanderlustError};
use crate::planner::TripResult;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

/// Trip store kept in process memory
///
/// Useful for tests and dry runs. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryTripStore {
    // user id -> trips in creation order
    trips: Mutex<HashMap<String, Vec<StoredTrip>>>,
}

impl MemoryTripStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    WanderlustError::Storage("trip store lock poisoned".to_string()).into()
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn fetch_trips(&self, user_id: &str) -> Result<Vec<StoredTrip>> {
        let trips = self.trips.lock().map_err(poisoned)?;
        Ok(trips
            .get(&normalize_user_id(user_id))
            .map(|list| list.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn save_trip(&self, user_id: &str, trip: &TripResult) -> Result<StoredTrip> {
        let mut saved = trip.clone();
        saved.mark_saved();
        let now = Utc::now();

        let mut trips = self.trips.lock().map_err(poisoned)?;
        let list = trips.entry(normalize_user_id(user_id)).or_default();

        let stored = match list.iter_mut().find(|s| s.trip.trip_id == saved.trip_id) {
            Some(existing) => {
                existing.trip = saved;
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let stored = StoredTrip {
                    trip: saved,
                    created_at: now,
                    updated_at: now,
                };
                list.push(stored.clone());
                stored
            }
        };
        Ok(stored)
    }
}
