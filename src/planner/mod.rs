//! Trip planning
//!
//! Trip parameters ([`TripInput`]) go in, a structured [`TripResult`] comes
//! out. [`TripPlanner`] runs the session; the result types also carry the
//! editing operations used after a plan is produced.

pub mod extract;
pub mod input;
mod lenient;
pub mod result;
pub mod session;

pub use extract::{extract_trip, normalize_terminal_response, TRIP_ID_PLACEHOLDER};
pub use input::{
    AccommodationBudget, AccommodationType, BookingPreference, BudgetType, Currency,
    TransportMode, TripInput,
};
pub use result::{
    AccommodationOption, CostBreakdown, DayPlan, EstimatedCosts, FoodOption, ItemField,
    ItineraryItem, OptionKind, TransportOption, TripResult, TripStatus, ValidationIssue,
    EXPECTED_OPTION_COUNT,
};
pub use session::{PlanOutcome, TripPlanner};
