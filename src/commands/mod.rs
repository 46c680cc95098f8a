/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `plan`: run a planning session and optionally save the result
- `trips`: list, show and edit saved trips
- `assist`: single-shot analysis, reasoning and maps queries

Handlers receive their collaborators (planner, store, assistant) from the
entrypoint and only deal with input conversion and output.
*/

pub mod assist;
pub mod plan;
pub mod trips;

use crate::error::{Result, WanderlustError};
use crate::planner::{Currency, TripResult, TripStatus};
use colored::Colorize;
use prettytable::{row, Table};
use serde::Serialize;

/// Serialize a value as pretty JSON
///
/// # Errors
///
/// Returns `WanderlustError::Serialization` if serialization fails
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| WanderlustError::Serialization(e).into())
}

/// Format an amount with the currency symbol when known
///
/// # Examples
///
/// ```
/// use wanderlust::commands::format_money;
///
/// assert_eq!(format_money("INR", 12500.0), "₹12500");
/// assert_eq!(format_money("EUR", 99.6), "EUR 100");
/// ```
pub fn format_money(currency: &str, amount: f64) -> String {
    match Currency::from_code(currency) {
        Some(known) => format!("{}{:.0}", known.symbol(), amount),
        None if currency.is_empty() => format!("{:.0}", amount),
        None => format!("{} {:.0}", currency, amount),
    }
}

/// Colored label for a trip status
pub fn status_badge(status: TripStatus) -> String {
    match status {
        TripStatus::Draft => "DRAFT".yellow().to_string(),
        TripStatus::Saved => "SAVED".green().to_string(),
        TripStatus::Booked => "BOOKED".blue().bold().to_string(),
    }
}

fn marker(selected: bool, booked: bool) -> &'static str {
    match (selected, booked) {
        (_, true) => "booked",
        (true, false) => "selected",
        (false, false) => "",
    }
}

/// Print a trip: header, option tables, itinerary and cost breakdown
pub fn print_trip(trip: &TripResult) {
    let money = |amount: f64| format_money(&trip.currency, amount);

    println!(
        "\n{} {} ({} people) [{}]",
        "Trip".bold(),
        trip.destination,
        trip.people,
        status_badge(trip.status)
    );
    println!("Id: {}", trip.trip_id);
    if !trip.vibe_analysis.is_empty() {
        println!("Vibe: {}", trip.vibe_analysis);
    }

    let mut transport = Table::new();
    transport.add_row(row!["", "Id", "Type", "Provider", "Departs", "Arrives", "Duration", "Cost"]);
    for option in &trip.transport_options {
        transport.add_row(row![
            marker(option.id == trip.selected_transport_id, option.booked),
            option.id,
            option.mode,
            option.provider,
            option.departure_time,
            option.arrival_time,
            option.duration,
            money(option.cost)
        ]);
    }
    println!("\nTransport:");
    transport.printstd();

    let mut stays = Table::new();
    stays.add_row(row!["", "Id", "Name", "Type", "Location", "Per Night", "Total", "Rating"]);
    for option in &trip.accommodation_options {
        stays.add_row(row![
            marker(option.id == trip.selected_accommodation_id, option.booked),
            option.id,
            option.name,
            option.stay_type,
            option.location,
            money(option.cost_per_night),
            money(option.total_cost),
            format!("{:.1}", option.rating)
        ]);
    }
    println!("\nAccommodation:");
    stays.printstd();

    let mut food = Table::new();
    food.add_row(row!["", "Id", "Name", "Cuisine", "Type", "Per Person", "Rating"]);
    for option in &trip.food_options {
        food.add_row(row![
            marker(option.id == trip.selected_food_id, option.booked),
            option.id,
            option.name,
            option.cuisine,
            option.dining_type,
            money(option.cost_per_person),
            format!("{:.1}", option.rating)
        ]);
    }
    println!("\nDining:");
    food.printstd();

    for day in &trip.itinerary {
        println!("\n{} {} {} - {}", "Day".bold(), day.day, day.date, day.theme);
        let mut items = Table::new();
        items.add_row(row!["Id", "Time", "Activity", "Location", "Cost", "Notes"]);
        for item in &day.items {
            items.add_row(row![
                item.id,
                item.time,
                item.activity,
                item.location,
                money(item.cost_estimate),
                item.notes
            ]);
        }
        items.printstd();
    }

    let costs = trip.cost_breakdown();
    println!("\n{}", "Estimated costs".bold());
    println!("  Transport:    {}", money(costs.transport));
    println!("  Stay:         {}", money(costs.stay));
    println!("  Food:         {}", money(costs.food));
    println!("  Activities:   {}", money(costs.activities));
    let total = money(costs.total);
    if costs.is_high_spend(&trip.currency) {
        println!("  Total:        {} {}", total.red().bold(), "(high spend)".red());
    } else {
        println!("  Total:        {}", total.bold());
    }
    println!();
}
