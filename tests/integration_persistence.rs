//! Integration tests for trip persistence
//!
//! Plans produced by a planning session are saved, reloaded, edited and
//! booked through the `TripStore` interface on a temporary SQLite database.

mod common;

use common::{create_temp_store, goa_input, goa_plan_json, ScriptedProvider};
use std::sync::Arc;
use wanderlust::config::PlannerConfig;
use wanderlust::error::WanderlustError;
use wanderlust::planner::{ItemField, OptionKind, TripPlanner, TripStatus};
use wanderlust::providers::Message;
use wanderlust::storage::{SqliteTripStore, TripStore};
use wanderlust::tools::{StubCatalog, ToolRegistry};

async fn planned_trip() -> wanderlust::planner::TripResult {
    let provider = Arc::new(ScriptedProvider::new(vec![Message::assistant(
        goa_plan_json(),
    )]));
    let planner = TripPlanner::new(
        provider,
        ToolRegistry::trip_tools(Arc::new(StubCatalog::new().unwrap())),
        PlannerConfig::default(),
    );
    planner.plan(&goa_input()).await.unwrap().trip
}

#[tokio::test]
async fn test_planned_trip_round_trips_through_sqlite() {
    let (store, _dir) = create_temp_store();
    let trip = planned_trip().await;
    assert_eq!(trip.status, TripStatus::Draft);

    store.save_trip("traveler", &trip).await.unwrap();
    let stored = store.require_trip("traveler", &trip.trip_id).await.unwrap();

    assert_eq!(stored.status(), TripStatus::Saved);
    assert_eq!(stored.trip.transport_options, trip.transport_options);
    assert_eq!(stored.trip.itinerary, trip.itinerary);
    assert_eq!(stored.trip.cost_breakdown(), trip.cost_breakdown());
}

#[tokio::test]
async fn test_edit_and_book_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("trips.db");
    let trip = planned_trip().await;

    {
        let store = SqliteTripStore::new_with_path(db_path.clone()).unwrap();
        store.save_trip("ana@example.com", &trip).await.unwrap();

        let mut loaded = store
            .require_trip("ana@example.com", &trip.trip_id)
            .await
            .unwrap()
            .trip;
        loaded
            .update_item(0, "i_2", ItemField::Notes, "Reserve a table by the sea")
            .unwrap();
        loaded.book_option(OptionKind::Accommodation, "a_2").unwrap();
        store.save_trip("ana@example.com", &loaded).await.unwrap();
    }

    let store = SqliteTripStore::new_with_path(db_path).unwrap();
    let stored = store
        .require_trip("ANA@example.com", &trip.trip_id)
        .await
        .unwrap();

    assert_eq!(stored.status(), TripStatus::Booked);
    assert_eq!(stored.trip.selected_accommodation_id, "a_2");
    let booked: Vec<bool> = stored
        .trip
        .accommodation_options
        .iter()
        .map(|o| o.booked)
        .collect();
    assert_eq!(booked, vec![false, true, false]);
    assert_eq!(
        stored.trip.itinerary[0].items[1].notes,
        "Reserve a table by the sea"
    );
    assert_eq!(stored.trip.itinerary[0].items[1].activity, "Lunch at Coastal Flavors");
}

#[tokio::test]
async fn test_users_are_isolated() {
    let (store, _dir) = create_temp_store();
    let trip = planned_trip().await;
    store.save_trip("ana", &trip).await.unwrap();

    assert!(store.fetch_trips("bob").await.unwrap().is_empty());
    let err = store.require_trip("bob", &trip.trip_id).await.err().unwrap();
    assert!(matches!(
        err.downcast_ref::<WanderlustError>(),
        Some(WanderlustError::TripNotFound(_))
    ));
}

#[tokio::test]
async fn test_each_plan_gets_its_own_id() {
    let (store, _dir) = create_temp_store();
    let first = planned_trip().await;
    let second = planned_trip().await;
    assert_ne!(first.trip_id, second.trip_id);

    store.save_trip("ana", &first).await.unwrap();
    store.save_trip("ana", &second).await.unwrap();

    let ids: Vec<String> = store
        .fetch_trips("ana")
        .await
        .unwrap()
        .iter()
        .map(|s| s.id().to_string())
        .collect();
    assert_eq!(ids, vec![second.trip_id, first.trip_id]);
}
