//! `wanderlust trips`

use super::{format_money, print_trip, status_badge, to_pretty_json};
use crate::cli::TripCommand;
use crate::error::{Result, WanderlustError};
use crate::storage::{StoredTrip, TripStore};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle trip management commands against a store
///
/// Every mutating command loads the trip, applies the change and saves it
/// back. Returns the affected trip, or `None` for `list`.
///
/// # Errors
///
/// Returns `WanderlustError::TripNotFound` for an unknown trip id, or the
/// error of the rejected change
pub async fn handle_trips(store: &dyn TripStore, command: TripCommand) -> Result<Option<StoredTrip>> {
    match command {
        TripCommand::List { user, json } => {
            let trips = store.fetch_trips(&user).await?;
            if json {
                let plans: Vec<_> = trips.iter().map(|stored| &stored.trip).collect();
                println!("{}", to_pretty_json(&plans)?);
            } else {
                print_trip_list(&user, &trips);
            }
            Ok(None)
        }
        TripCommand::Show {
            trip_id,
            user,
            json,
        } => {
            let stored = store.require_trip(&user, &trip_id).await?;
            if json {
                println!("{}", to_pretty_json(&stored.trip)?);
            } else {
                print_trip(&stored.trip);
            }
            Ok(Some(stored))
        }
        TripCommand::Select {
            trip_id,
            kind,
            option_id,
            user,
        } => {
            let mut trip = store.require_trip(&user, &trip_id).await?.trip;
            trip.select_option(kind, &option_id)?;
            let stored = store.save_trip(&user, &trip).await?;
            println!("Selected {} {} on trip {}", kind, option_id.cyan(), trip_id);
            Ok(Some(stored))
        }
        TripCommand::Book {
            trip_id,
            kind,
            option_id,
            user,
        } => {
            let mut trip = store.require_trip(&user, &trip_id).await?.trip;
            trip.book_option(kind, &option_id)?;
            let stored = store.save_trip(&user, &trip).await?;
            println!(
                "{} {} {} on trip {}",
                "Booked".green().bold(),
                kind,
                option_id.cyan(),
                trip_id
            );
            Ok(Some(stored))
        }
        TripCommand::Edit {
            trip_id,
            day,
            item,
            field,
            value,
            user,
        } => {
            let day_index = day.checked_sub(1).ok_or_else(|| {
                WanderlustError::InvalidInput("day numbers start at 1".to_string())
            })?;
            let mut trip = store.require_trip(&user, &trip_id).await?.trip;
            trip.update_item(day_index, &item, field, value)?;
            let stored = store.save_trip(&user, &trip).await?;
            println!("Updated {} of {} on day {}", field, item.cyan(), day);
            Ok(Some(stored))
        }
    }
}

fn print_trip_list(user: &str, trips: &[StoredTrip]) {
    if trips.is_empty() {
        println!("{}", format!("No saved trips for {}.", user).yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Destination".bold(),
        "Status".bold(),
        "People".bold(),
        "Total".bold(),
        "Created".bold()
    ]);

    for stored in trips {
        let trip = &stored.trip;
        table.add_row(prettytable::row![
            trip.trip_id.cyan(),
            trip.destination,
            status_badge(trip.status),
            trip.people,
            format_money(&trip.currency, trip.cost_breakdown().total),
            stored.created_at.format("%Y-%m-%d %H:%M")
        ]);
    }

    println!("\nSaved trips for {}:", user);
    table.printstd();
    println!();
    println!("Use {} to see a plan.", "wanderlust trips show <ID>".cyan());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{
        DayPlan, FoodOption, ItemField, ItineraryItem, OptionKind, TransportOption, TripResult,
        TripStatus,
    };
    use crate::storage::MemoryTripStore;

    fn trip() -> TripResult {
        TripResult {
            trip_id: "trip-1".to_string(),
            destination: "Goa, India".to_string(),
            currency: "INR".to_string(),
            people: 2,
            transport_options: vec![
                TransportOption {
                    id: "t1".to_string(),
                    cost: 9000.0,
                    ..TransportOption::default()
                },
                TransportOption {
                    id: "t2".to_string(),
                    cost: 3000.0,
                    ..TransportOption::default()
                },
            ],
            food_options: vec![FoodOption {
                id: "f1".to_string(),
                cost_per_person: 1500.0,
                ..FoodOption::default()
            }],
            selected_transport_id: "t1".to_string(),
            itinerary: vec![DayPlan {
                day: 1,
                items: vec![ItineraryItem {
                    id: "i1".to_string(),
                    activity: "Beach walk".to_string(),
                    ..ItineraryItem::default()
                }],
                ..DayPlan::default()
            }],
            ..TripResult::default()
        }
    }

    async fn seeded() -> MemoryTripStore {
        let store = MemoryTripStore::new();
        store.save_trip("ana", &trip()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_list_returns_none() {
        let store = seeded().await;
        let result = handle_trips(
            &store,
            TripCommand::List {
                user: "ana".to_string(),
                json: true,
            },
        )
        .await
        .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_show_unknown_trip() {
        let store = seeded().await;
        let err = handle_trips(
            &store,
            TripCommand::Show {
                trip_id: "missing".to_string(),
                user: "ana".to_string(),
                json: true,
            },
        )
        .await
        .err()
        .unwrap();
        assert!(matches!(
            err.downcast_ref::<WanderlustError>(),
            Some(WanderlustError::TripNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_select_persists() {
        let store = seeded().await;
        handle_trips(
            &store,
            TripCommand::Select {
                trip_id: "trip-1".to_string(),
                kind: OptionKind::Transport,
                option_id: "t2".to_string(),
                user: "ana".to_string(),
            },
        )
        .await
        .unwrap();

        let stored = store.require_trip("ana", "trip-1").await.unwrap();
        assert_eq!(stored.trip.selected_transport_id, "t2");
        assert_eq!(stored.status(), TripStatus::Saved);
    }

    #[tokio::test]
    async fn test_book_marks_trip_booked() {
        let store = seeded().await;
        let stored = handle_trips(
            &store,
            TripCommand::Book {
                trip_id: "trip-1".to_string(),
                kind: OptionKind::Food,
                option_id: "f1".to_string(),
                user: "ana".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(stored.status(), TripStatus::Booked);
        assert!(stored.trip.food_options[0].booked);

        let reloaded = store.require_trip("ana", "trip-1").await.unwrap();
        assert_eq!(reloaded.status(), TripStatus::Booked);
    }

    #[tokio::test]
    async fn test_book_unknown_option_leaves_trip_unchanged() {
        let store = seeded().await;
        let result = handle_trips(
            &store,
            TripCommand::Book {
                trip_id: "trip-1".to_string(),
                kind: OptionKind::Transport,
                option_id: "t9".to_string(),
                user: "ana".to_string(),
            },
        )
        .await;
        assert!(result.is_err());

        let stored = store.require_trip("ana", "trip-1").await.unwrap();
        assert_eq!(stored.status(), TripStatus::Saved);
    }

    #[tokio::test]
    async fn test_edit_uses_one_based_days() {
        let store = seeded().await;
        handle_trips(
            &store,
            TripCommand::Edit {
                trip_id: "trip-1".to_string(),
                day: 1,
                item: "i1".to_string(),
                field: ItemField::Notes,
                value: "Bring sunscreen".to_string(),
                user: "ana".to_string(),
            },
        )
        .await
        .unwrap();

        let stored = store.require_trip("ana", "trip-1").await.unwrap();
        assert_eq!(stored.trip.itinerary[0].items[0].notes, "Bring sunscreen");
        assert_eq!(stored.trip.itinerary[0].items[0].activity, "Beach walk");
    }

    #[tokio::test]
    async fn test_edit_rejects_day_zero() {
        let store = seeded().await;
        let result = handle_trips(
            &store,
            TripCommand::Edit {
                trip_id: "trip-1".to_string(),
                day: 0,
                item: "i1".to_string(),
                field: ItemField::Activity,
                value: "Nap".to_string(),
                user: "ana".to_string(),
            },
        )
        .await;
        assert!(result.is_err());
    }
}
