//! System prompts for planning sessions
//!
//! This module builds the instruction block that opens every planning
//! conversation. The content depends only on the trip parameters.

pub mod trip_prompt;

pub use trip_prompt::{MEALS_PER_DAY, PLAN_REQUEST};

use crate::planner::input::TripInput;

/// Builds the system prompt for a planning session
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wanderlust::planner::TripInput;
/// use wanderlust::prompts::build_system_prompt;
///
/// let input = TripInput::new(
///     "Austin",
///     "Lisbon",
///     NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 5, 6).unwrap(),
///     4500.0,
/// );
/// let prompt = build_system_prompt(&input);
/// assert!(prompt.contains("search_transport"));
/// ```
pub fn build_system_prompt(input: &TripInput) -> String {
    trip_prompt::generate_trip_prompt(input)
}
