//! Structured trip plan produced by the planner
//!
//! The wire format is camelCase JSON, matching what the model is instructed
//! to emit. Every field has a default so that any parseable object becomes a
//! `TripResult`; structural problems are reported by [`TripResult::validate`]
//! instead of failing the parse.

use super::lenient;
use crate::error::{Result, WanderlustError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of options the model is asked to provide per category
pub const EXPECTED_OPTION_COUNT: usize = 3;

/// Lifecycle status of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    /// Freshly generated, not yet saved
    #[default]
    Draft,
    /// Persisted by the user
    Saved,
    /// At least one option booked
    Booked,
}

impl TripStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::Saved => "saved",
            TripStatus::Booked => "booked",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One way of getting from origin to destination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportOption {
    /// Option id, referenced by `selectedTransportId`
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Mode (flight, train, ...)
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub mode: String,
    /// Carrier or operator
    #[serde(deserialize_with = "lenient::string")]
    pub provider: String,
    /// Departure time
    #[serde(deserialize_with = "lenient::string")]
    pub departure_time: String,
    /// Arrival time
    #[serde(deserialize_with = "lenient::string")]
    pub arrival_time: String,
    /// Travel duration
    #[serde(deserialize_with = "lenient::string")]
    pub duration: String,
    /// Cost for the party
    #[serde(deserialize_with = "lenient::number")]
    pub cost: f64,
    /// Whether this option has been booked
    #[serde(deserialize_with = "lenient::flag")]
    pub booked: bool,
}

/// A place to stay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccommodationOption {
    /// Option id, referenced by `selectedAccommodationId`
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Property name
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Lodging type (hotel, airbnb, ...)
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub stay_type: String,
    /// Neighbourhood or address
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    /// Nightly rate
    #[serde(deserialize_with = "lenient::number")]
    pub cost_per_night: f64,
    /// Cost for the whole stay
    #[serde(deserialize_with = "lenient::number")]
    pub total_cost: f64,
    /// Amenity labels
    #[serde(deserialize_with = "lenient::strings")]
    pub amenities: Vec<String>,
    /// Guest rating out of 5
    #[serde(deserialize_with = "lenient::number")]
    pub rating: f64,
    /// Whether this option has been booked
    #[serde(deserialize_with = "lenient::flag")]
    pub booked: bool,
}

/// A featured dining experience
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FoodOption {
    /// Option id, referenced by `selectedFoodId`
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Restaurant name
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Cuisine description
    #[serde(deserialize_with = "lenient::string")]
    pub cuisine: String,
    /// Dining style ("Fine Dining", "Street Food", ...)
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub dining_type: String,
    /// Area of town
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    /// Cost per person
    #[serde(deserialize_with = "lenient::number")]
    pub cost_per_person: f64,
    /// Rating out of 5
    #[serde(deserialize_with = "lenient::number")]
    pub rating: f64,
    /// Whether a table has been reserved
    #[serde(deserialize_with = "lenient::flag")]
    pub booked: bool,
}

/// One entry in a day plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItineraryItem {
    /// Item id, unique within the trip
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Time of day ("Morning", "10:00 AM")
    #[serde(deserialize_with = "lenient::string")]
    pub time: String,
    /// What happens
    #[serde(deserialize_with = "lenient::string")]
    pub activity: String,
    /// Estimated cost
    #[serde(deserialize_with = "lenient::number")]
    pub cost_estimate: f64,
    /// Where it happens
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    /// Free-form notes
    #[serde(deserialize_with = "lenient::string")]
    pub notes: String,
}

/// Plan for one day of the trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayPlan {
    /// Day number, starting at 1
    #[serde(deserialize_with = "lenient::count")]
    pub day: u32,
    /// Calendar date (`YYYY-MM-DD`)
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,
    /// Theme of the day
    #[serde(deserialize_with = "lenient::string")]
    pub theme: String,
    /// Ordered items
    #[serde(deserialize_with = "lenient::list")]
    pub items: Vec<ItineraryItem>,
}

/// Base estimates for variable costs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatedCosts {
    /// Total estimated food cost for the trip
    #[serde(deserialize_with = "lenient::number")]
    pub food: f64,
    /// Total estimated activity cost for the trip
    #[serde(deserialize_with = "lenient::number")]
    pub activities: f64,
}

/// The structured trip plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripResult {
    /// Trip id, unique per user
    #[serde(deserialize_with = "lenient::string")]
    pub trip_id: String,
    /// Destination name
    #[serde(deserialize_with = "lenient::string")]
    pub destination: String,
    /// Party size
    #[serde(deserialize_with = "lenient::count")]
    pub people: u32,
    /// Currency code for all costs
    #[serde(deserialize_with = "lenient::string")]
    pub currency: String,
    /// Mood of the trip as read from the description and image
    #[serde(deserialize_with = "lenient::string")]
    pub vibe_analysis: String,
    /// Lifecycle status
    #[serde(deserialize_with = "lenient::status")]
    pub status: TripStatus,
    /// Transport options
    #[serde(deserialize_with = "lenient::list")]
    pub transport_options: Vec<TransportOption>,
    /// Accommodation options
    #[serde(deserialize_with = "lenient::list")]
    pub accommodation_options: Vec<AccommodationOption>,
    /// Dining options
    #[serde(deserialize_with = "lenient::list")]
    pub food_options: Vec<FoodOption>,
    /// Selected transport option id
    #[serde(deserialize_with = "lenient::string")]
    pub selected_transport_id: String,
    /// Selected accommodation option id
    #[serde(deserialize_with = "lenient::string")]
    pub selected_accommodation_id: String,
    /// Selected dining option id
    #[serde(deserialize_with = "lenient::string")]
    pub selected_food_id: String,
    /// Day-by-day itinerary
    #[serde(deserialize_with = "lenient::list")]
    pub itinerary: Vec<DayPlan>,
    /// Variable cost estimates
    #[serde(deserialize_with = "lenient::costs")]
    pub estimated_costs: EstimatedCosts,
}

/// Option category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Transport options
    Transport,
    /// Accommodation options
    Accommodation,
    /// Dining options
    Food,
}

impl OptionKind {
    /// Lowercase category name
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Transport => "transport",
            OptionKind::Accommodation => "accommodation",
            OptionKind::Food => "food",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transport" => Ok(OptionKind::Transport),
            "accommodation" | "stay" => Ok(OptionKind::Accommodation),
            "food" | "dining" => Ok(OptionKind::Food),
            other => Err(format!(
                "unknown option kind '{}' (expected transport, accommodation or food)",
                other
            )),
        }
    }
}

/// Editable itinerary item field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    /// The activity text
    Activity,
    /// The notes text
    Notes,
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemField::Activity => "activity",
            ItemField::Notes => "notes",
        })
    }
}

impl FromStr for ItemField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "activity" => Ok(ItemField::Activity),
            "notes" => Ok(ItemField::Notes),
            other => Err(format!(
                "unknown item field '{}' (expected activity or notes)",
                other
            )),
        }
    }
}

/// Structural problem found in a parsed plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A category does not hold the expected number of options
    OptionCount {
        /// Category
        kind: OptionKind,
        /// Number of options present
        count: usize,
    },
    /// A selected id does not reference any option in its category
    DanglingSelection {
        /// Category
        kind: OptionKind,
        /// Selected id
        id: String,
    },
    /// The plan has no days
    EmptyItinerary,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::OptionCount { kind, count } => write!(
                f,
                "expected {} {} options, found {}",
                EXPECTED_OPTION_COUNT, kind, count
            ),
            ValidationIssue::DanglingSelection { kind, id } => {
                write!(f, "selected {} id '{}' matches no option", kind, id)
            }
            ValidationIssue::EmptyItinerary => f.write_str("itinerary has no days"),
        }
    }
}

/// Cost totals for the current selection
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostBreakdown {
    /// Selected transport cost
    pub transport: f64,
    /// Selected accommodation total
    pub stay: f64,
    /// Estimated food plus featured dining for the party
    pub food: f64,
    /// Estimated activities
    pub activities: f64,
    /// Sum of all of the above
    pub total: f64,
}

impl CostBreakdown {
    /// Whether the total is high enough to flag for the given currency
    ///
    /// The threshold is 100,000 for INR and 5,000 for anything else.
    pub fn is_high_spend(&self, currency: &str) -> bool {
        let threshold = if currency.eq_ignore_ascii_case("INR") {
            100_000.0
        } else {
            5_000.0
        };
        self.total > threshold
    }
}

/// Find the selected option, falling back to the first one
fn selected_or_first<'a, T>(options: &'a [T], selected: &str, id_of: fn(&T) -> &str) -> Option<&'a T> {
    options
        .iter()
        .find(|option| id_of(option) == selected)
        .or_else(|| options.first())
}

impl TripResult {
    /// Report structural issues without failing
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::planner::TripResult;
    ///
    /// let issues = TripResult::default().validate();
    /// assert!(!issues.is_empty());
    /// ```
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let categories: [(OptionKind, Vec<&str>, &str); 3] = [
            (
                OptionKind::Transport,
                self.transport_options.iter().map(|o| o.id.as_str()).collect(),
                &self.selected_transport_id,
            ),
            (
                OptionKind::Accommodation,
                self.accommodation_options
                    .iter()
                    .map(|o| o.id.as_str())
                    .collect(),
                &self.selected_accommodation_id,
            ),
            (
                OptionKind::Food,
                self.food_options.iter().map(|o| o.id.as_str()).collect(),
                &self.selected_food_id,
            ),
        ];

        for (kind, ids, selected) in categories {
            if ids.len() != EXPECTED_OPTION_COUNT {
                issues.push(ValidationIssue::OptionCount {
                    kind,
                    count: ids.len(),
                });
            }
            if !ids.contains(&selected) {
                issues.push(ValidationIssue::DanglingSelection {
                    kind,
                    id: selected.to_string(),
                });
            }
        }

        if self.itinerary.is_empty() {
            issues.push(ValidationIssue::EmptyItinerary);
        }

        issues
    }

    fn option_ids(&self, kind: OptionKind) -> Vec<&str> {
        match kind {
            OptionKind::Transport => self.transport_options.iter().map(|o| o.id.as_str()).collect(),
            OptionKind::Accommodation => self
                .accommodation_options
                .iter()
                .map(|o| o.id.as_str())
                .collect(),
            OptionKind::Food => self.food_options.iter().map(|o| o.id.as_str()).collect(),
        }
    }

    fn ensure_option(&self, kind: OptionKind, id: &str) -> Result<()> {
        if self.option_ids(kind).contains(&id) {
            Ok(())
        } else {
            Err(WanderlustError::OptionNotFound {
                kind: kind.to_string(),
                id: id.to_string(),
            }
            .into())
        }
    }

    /// Change the selected option in a category
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::OptionNotFound` if no option has that id
    pub fn select_option(&mut self, kind: OptionKind, id: &str) -> Result<()> {
        self.ensure_option(kind, id)?;
        match kind {
            OptionKind::Transport => self.selected_transport_id = id.to_string(),
            OptionKind::Accommodation => self.selected_accommodation_id = id.to_string(),
            OptionKind::Food => self.selected_food_id = id.to_string(),
        }
        Ok(())
    }

    /// Book exactly one option in a category
    ///
    /// The option becomes the selection, its siblings are unbooked, and the
    /// trip status becomes `booked`.
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::OptionNotFound` if no option has that id
    pub fn book_option(&mut self, kind: OptionKind, id: &str) -> Result<()> {
        self.select_option(kind, id)?;
        match kind {
            OptionKind::Transport => self
                .transport_options
                .iter_mut()
                .for_each(|o| o.booked = o.id == id),
            OptionKind::Accommodation => self
                .accommodation_options
                .iter_mut()
                .for_each(|o| o.booked = o.id == id),
            OptionKind::Food => self
                .food_options
                .iter_mut()
                .for_each(|o| o.booked = o.id == id),
        }
        self.status = TripStatus::Booked;
        Ok(())
    }

    /// Edit the activity or notes of an itinerary item
    ///
    /// `day_index` is zero-based.
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::InvalidInput` if the day or item does not exist
    pub fn update_item(
        &mut self,
        day_index: usize,
        item_id: &str,
        field: ItemField,
        value: impl Into<String>,
    ) -> Result<()> {
        let days = self.itinerary.len();
        let day = self.itinerary.get_mut(day_index).ok_or_else(|| {
            WanderlustError::InvalidInput(format!(
                "day index {} out of range (trip has {} days)",
                day_index, days
            ))
        })?;

        let day_number = day.day;
        let item = day
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| {
                WanderlustError::InvalidInput(format!(
                    "no item '{}' on day {}",
                    item_id, day_number
                ))
            })?;

        match field {
            ItemField::Activity => item.activity = value.into(),
            ItemField::Notes => item.notes = value.into(),
        }
        Ok(())
    }

    /// Selected transport option, or the first one if the selection dangles
    pub fn selected_transport(&self) -> Option<&TransportOption> {
        selected_or_first(&self.transport_options, &self.selected_transport_id, |o| o.id.as_str())
    }

    /// Selected accommodation option, or the first one if the selection dangles
    pub fn selected_accommodation(&self) -> Option<&AccommodationOption> {
        selected_or_first(
            &self.accommodation_options,
            &self.selected_accommodation_id,
            |o| o.id.as_str(),
        )
    }

    /// Selected dining option, or the first one if the selection dangles
    pub fn selected_food(&self) -> Option<&FoodOption> {
        selected_or_first(&self.food_options, &self.selected_food_id, |o| o.id.as_str())
    }

    /// Compute cost totals for the current selection
    ///
    /// Featured dining is charged per person for the whole party.
    pub fn cost_breakdown(&self) -> CostBreakdown {
        let transport = self.selected_transport().map(|o| o.cost).unwrap_or(0.0);
        let stay = self
            .selected_accommodation()
            .map(|o| o.total_cost)
            .unwrap_or(0.0);
        let featured_dining = self
            .selected_food()
            .map(|o| o.cost_per_person * f64::from(self.people))
            .unwrap_or(0.0);
        let food = self.estimated_costs.food + featured_dining;
        let activities = self.estimated_costs.activities;

        CostBreakdown {
            transport,
            stay,
            food,
            activities,
            total: transport + stay + food + activities,
        }
    }

    /// Book the current selection in every category that has options
    ///
    /// Dangling selections book the first option.
    pub fn book_selected(&mut self) -> Result<()> {
        let picks = [
            (OptionKind::Transport, self.selected_transport().map(|o| o.id.clone())),
            (
                OptionKind::Accommodation,
                self.selected_accommodation().map(|o| o.id.clone()),
            ),
            (OptionKind::Food, self.selected_food().map(|o| o.id.clone())),
        ];
        for (kind, id) in picks {
            if let Some(id) = id {
                self.book_option(kind, &id)?;
            }
        }
        Ok(())
    }

    /// Mark a draft as saved; booked trips stay booked
    pub fn mark_saved(&mut self) {
        if self.status == TripStatus::Draft {
            self.status = TripStatus::Saved;
        }
    }
}
