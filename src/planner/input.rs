//! Trip parameters supplied by the traveller
//!
//! A `TripInput` is created once per planning session and never mutated by
//! the planner.

use crate::error::{Result, WanderlustError};
use crate::providers::InlineImage;
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency used for every cost in a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar
    #[default]
    #[value(name = "USD", alias = "usd")]
    Usd,
    /// Indian rupee
    #[value(name = "INR", alias = "inr")]
    Inr,
}

impl Currency {
    /// ISO currency code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
        }
    }

    /// Display symbol
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::planner::Currency;
    ///
    /// assert_eq!(Currency::Inr.symbol(), "₹");
    /// assert_eq!(Currency::Usd.symbol(), "$");
    /// ```
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "₹",
        }
    }

    /// Look up a currency by code, ignoring case
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "INR" => Some(Currency::Inr),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether the budget covers the whole party or each traveller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BudgetType {
    /// Budget for the whole party
    #[default]
    Total,
    /// Budget per traveller
    #[value(name = "per_person", alias = "per-person")]
    PerPerson,
}

impl BudgetType {
    /// Wire name of the budget type
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetType::Total => "total",
            BudgetType::PerPerson => "per_person",
        }
    }
}

/// Preferred mode of transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Air travel
    #[default]
    Flight,
    /// Rail
    Train,
    /// Coach
    Bus,
    /// Rental car
    Car,
}

impl TransportMode {
    /// Wire name of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Flight => "flight",
            TransportMode::Train => "train",
            TransportMode::Bus => "bus",
            TransportMode::Car => "car",
        }
    }

    /// Parse a mode name as sent by the model; unknown modes map to `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "flight" | "plane" | "air" => Some(TransportMode::Flight),
            "train" | "rail" => Some(TransportMode::Train),
            "bus" | "coach" => Some(TransportMode::Bus),
            "car" => Some(TransportMode::Car),
            _ => None,
        }
    }
}

/// Kind of lodging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationType {
    /// Hotel
    #[default]
    Hotel,
    /// Short-term rental
    Airbnb,
}

impl AccommodationType {
    /// Wire name of the lodging type
    pub fn as_str(&self) -> &'static str {
        match self {
            AccommodationType::Hotel => "hotel",
            AccommodationType::Airbnb => "airbnb",
        }
    }
}

/// Lodging price band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationBudget {
    /// Budget stays
    Budget,
    /// Mid-range stays
    #[default]
    #[value(name = "mid_range", alias = "mid-range")]
    MidRange,
    /// Luxury stays
    Luxury,
}

impl AccommodationBudget {
    /// Wire name of the price band
    pub fn as_str(&self) -> &'static str {
        match self {
            AccommodationBudget::Budget => "budget",
            AccommodationBudget::MidRange => "mid_range",
            AccommodationBudget::Luxury => "luxury",
        }
    }

    /// Parse a price band as sent by the model; anything unknown is budget
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "luxury" => AccommodationBudget::Luxury,
            "mid_range" | "midrange" | "moderate" => AccommodationBudget::MidRange,
            _ => AccommodationBudget::Budget,
        }
    }
}

/// Whether the planner may book on the user's behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BookingPreference {
    /// Book the selected options automatically
    #[value(name = "auto_book", alias = "auto-book")]
    AutoBook,
    /// Only suggest options
    #[default]
    #[value(name = "suggest_only", alias = "suggest-only")]
    SuggestOnly,
}

/// User-specified trip parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripInput {
    /// Where the trip starts
    pub from_location: String,
    /// Where the trip goes
    pub destination: String,
    /// Free-form wishes ("beaches and seafood")
    #[serde(default)]
    pub description: String,
    /// First day of the trip
    pub start_date: NaiveDate,
    /// Last day of the trip
    pub end_date: NaiveDate,
    /// Budget amount in `currency`
    pub total_budget: f64,
    /// Currency for all costs
    #[serde(default)]
    pub currency: Currency,
    /// Whether the budget is total or per person
    #[serde(default)]
    pub budget_type: BudgetType,
    /// Party size
    pub people: u32,
    /// Preferred transport
    #[serde(default)]
    pub transport: TransportMode,
    /// Preferred lodging
    #[serde(default)]
    pub accommodation_type: AccommodationType,
    /// Lodging price band
    #[serde(default)]
    pub accommodation_budget: AccommodationBudget,
    /// Booking behavior
    #[serde(default)]
    pub booking_preference: BookingPreference,
    /// Whether a tour guide should be included
    #[serde(default)]
    pub tour_guide: bool,
    /// Optional inspiration image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
}

impl TripInput {
    /// Create trip parameters with default preferences for one traveller
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use wanderlust::planner::TripInput;
    ///
    /// let input = TripInput::new(
    ///     "Mumbai",
    ///     "Goa, India",
    ///     NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
    ///     NaiveDate::from_ymd_opt(2026, 12, 24).unwrap(),
    ///     60000.0,
    /// );
    /// assert!(input.validate().is_ok());
    /// assert_eq!(input.nights(), 4);
    /// ```
    pub fn new(
        from_location: impl Into<String>,
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_budget: f64,
    ) -> Self {
        Self {
            from_location: from_location.into(),
            destination: destination.into(),
            description: String::new(),
            start_date,
            end_date,
            total_budget,
            currency: Currency::default(),
            budget_type: BudgetType::default(),
            people: 1,
            transport: TransportMode::default(),
            accommodation_type: AccommodationType::default(),
            accommodation_budget: AccommodationBudget::default(),
            booking_preference: BookingPreference::default(),
            tour_guide: false,
            image: None,
        }
    }

    /// Number of nights between start and end date
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Check the parameters before any request is sent
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::InvalidInput` for an empty origin or
    /// destination, zero travellers, a non-positive budget, or an end date
    /// before the start date
    pub fn validate(&self) -> Result<()> {
        if self.from_location.trim().is_empty() {
            return Err(WanderlustError::InvalidInput("origin cannot be empty".to_string()).into());
        }
        if self.destination.trim().is_empty() {
            return Err(
                WanderlustError::InvalidInput("destination cannot be empty".to_string()).into(),
            );
        }
        if self.people == 0 {
            return Err(
                WanderlustError::InvalidInput("at least one traveller is required".to_string())
                    .into(),
            );
        }
        if !self.total_budget.is_finite() || self.total_budget <= 0.0 {
            return Err(WanderlustError::InvalidInput(format!(
                "budget must be positive, got {}",
                self.total_budget
            ))
            .into());
        }
        if self.end_date < self.start_date {
            return Err(WanderlustError::InvalidInput(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            ))
            .into());
        }
        Ok(())
    }
}
