use crate::planner::{TripResult, TripStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted trip with its bookkeeping timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTrip {
    /// The saved plan
    pub trip: TripResult,
    /// When the trip was first saved
    pub created_at: DateTime<Utc>,
    /// When the trip was last saved
    pub updated_at: DateTime<Utc>,
}

impl StoredTrip {
    /// Trip id
    pub fn id(&self) -> &str {
        &self.trip.trip_id
    }

    /// Current status of the plan
    pub fn status(&self) -> TripStatus {
        self.trip.status
    }
}
