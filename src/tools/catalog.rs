//! Travel catalog collaborator
//!
//! The trip tools delegate to a [`TravelCatalog`]. [`StubCatalog`] returns
//! three plausible options per query, picking operators and price bands by
//! whether the route touches India.

use crate::error::Result;
use crate::planner::input::{AccommodationBudget, TransportMode};
use crate::planner::result::{FoodOption, TransportOption};
use async_trait::async_trait;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Transport lookup parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TransportQuery {
    /// Origin
    pub from: String,
    /// Destination
    pub to: String,
    /// Travel date as given by the model
    pub date: String,
    /// Mode of transport
    pub mode: TransportMode,
}

/// Accommodation lookup parameters
#[derive(Debug, Clone, PartialEq)]
pub struct StayQuery {
    /// Destination
    pub destination: String,
    /// Lodging type as given by the model (hotel, airbnb, ...)
    pub stay_type: String,
    /// Price band
    pub budget_level: AccommodationBudget,
}

/// Accommodation search hit
///
/// The model turns listings into `AccommodationOption`s, computing the stay
/// total from the nightly rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayListing {
    /// Listing id
    pub id: String,
    /// Property name
    pub name: String,
    /// Lodging type
    #[serde(rename = "type")]
    pub stay_type: String,
    /// Nightly rate
    pub cost_per_night: f64,
    /// Guest rating out of 5
    pub rating: f64,
    /// Neighbourhood
    pub address: String,
    /// Amenity labels
    pub amenities: Vec<String>,
    /// Always false for search hits
    pub booked: bool,
}

/// Source of transport, lodging and dining options
#[async_trait]
pub trait TravelCatalog: Send + Sync {
    /// Three transport options for a route
    async fn search_transport(&self, query: &TransportQuery) -> Result<Vec<TransportOption>>;

    /// Three accommodation listings in a destination
    async fn search_accommodation(&self, query: &StayQuery) -> Result<Vec<StayListing>>;

    /// Three featured dining options in a destination
    async fn search_food(&self, destination: &str) -> Result<Vec<FoodOption>>;
}

/// Catalog producing randomized but realistic options
pub struct StubCatalog {
    indian_city: Regex,
    indian_stay: Regex,
}

impl StubCatalog {
    /// Build the stub catalog
    ///
    /// # Errors
    ///
    /// Returns error if the destination patterns fail to compile
    pub fn new() -> Result<Self> {
        Ok(Self {
            indian_city: Regex::new(
                r"(?i)india|delhi|mumbai|bangalore|goa|chennai|kolkata|hyderabad",
            )?,
            indian_stay: Regex::new(r"(?i)india|delhi|mumbai|bangalore|goa")?,
        })
    }

    fn is_indian(&self, place: &str) -> bool {
        self.indian_city.is_match(place)
    }
}

fn price(min: u32, max: u32) -> f64 {
    f64::from(rand::rng().random_range(min..=max))
}

fn transport_price(mode: TransportMode, india: bool) -> f64 {
    match (mode, india) {
        (TransportMode::Flight, true) => price(4000, 12000),
        (TransportMode::Flight, false) => price(200, 800),
        (TransportMode::Train, true) => price(800, 3500),
        (TransportMode::Train, false) => price(50, 150),
        (TransportMode::Bus, true) => price(500, 2000),
        (TransportMode::Bus, false) => price(20, 80),
        (TransportMode::Car, true) => price(2500, 8000),
        (TransportMode::Car, false) => price(60, 200),
    }
}

fn operators(mode: TransportMode, india: bool) -> [&'static str; 3] {
    match (mode, india) {
        (TransportMode::Flight, true) => ["IndiGo", "Air India", "Vistara"],
        (TransportMode::Flight, false) => ["Emirates", "Lufthansa", "British Airways"],
        (TransportMode::Train, true) => ["Vande Bharat Exp", "Rajdhani Express", "Shatabdi Express"],
        (TransportMode::Train, false) => ["EuroStar", "Amtrak", "TGV"],
        (TransportMode::Bus, true) => ["Zingbus", "IntrCity SmartBus", "KSRTC Volvo"],
        (TransportMode::Bus, false) => ["FlixBus", "Greyhound", "Megabus"],
        (TransportMode::Car, _) => ["Hertz", "Avis", "Enterprise"],
    }
}

fn stay_price(band: AccommodationBudget, india: bool) -> f64 {
    match (band, india) {
        (AccommodationBudget::Luxury, true) => price(15000, 35000),
        (AccommodationBudget::Luxury, false) => price(300, 800),
        (AccommodationBudget::MidRange, true) => price(4000, 10000),
        (AccommodationBudget::MidRange, false) => price(120, 250),
        (AccommodationBudget::Budget, true) => price(1500, 3500),
        (AccommodationBudget::Budget, false) => price(60, 100),
    }
}

#[async_trait]
impl TravelCatalog for StubCatalog {
    async fn search_transport(&self, query: &TransportQuery) -> Result<Vec<TransportOption>> {
        let india = self.is_indian(&query.from) || self.is_indian(&query.to);
        let base = transport_price(query.mode, india);
        let [first, second, third] = operators(query.mode, india);
        let mode = query.mode.as_str().to_string();

        tracing::debug!(
            "Stub transport search: {} {} -> {} (india={})",
            mode,
            query.from,
            query.to,
            india
        );

        let option = |id: &str, provider: &str, cost: f64, duration: &str, dep: &str, arr: &str| {
            TransportOption {
                id: id.to_string(),
                mode: mode.clone(),
                provider: provider.to_string(),
                departure_time: dep.to_string(),
                arrival_time: arr.to_string(),
                duration: duration.to_string(),
                cost,
                booked: false,
            }
        };

        Ok(vec![
            option("t_1", first, base, "2h 30m", "08:00 AM", "10:30 AM"),
            option("t_2", second, (base * 1.2).floor(), "2h 15m", "06:00 AM", "08:15 AM"),
            option("t_3", third, (base * 0.85).floor(), "3h 15m", "09:00 PM", "12:15 AM"),
        ])
    }

    async fn search_accommodation(&self, query: &StayQuery) -> Result<Vec<StayListing>> {
        let india = self.indian_stay.is_match(&query.destination);
        let base = stay_price(query.budget_level, india);
        let dest = query.destination.as_str();
        let flagship = if query.stay_type == "hotel" {
            "Hotel"
        } else {
            "Villa"
        };

        tracing::debug!(
            "Stub accommodation search: {} {} in {}",
            query.budget_level.as_str(),
            query.stay_type,
            dest
        );

        let listing = |id: &str, name: String, cost: f64, rating: f64, address: &str, amenities: &[&str]| {
            StayListing {
                id: id.to_string(),
                name,
                stay_type: query.stay_type.clone(),
                cost_per_night: cost,
                rating,
                address: address.to_string(),
                amenities: amenities.iter().map(|a| a.to_string()).collect(),
                booked: false,
            }
        };

        Ok(vec![
            listing(
                "a_1",
                format!("Grand {} {}", dest, flagship),
                base,
                4.8,
                "City Center, Downtown",
                &["Pool", "Spa", "Free WiFi", "Breakfast"],
            ),
            listing(
                "a_2",
                format!("{} Boutique Stay", dest),
                (base * 0.85).floor(),
                4.5,
                "Arts District",
                &["Free WiFi", "Rooftop Bar", "Gym"],
            ),
            listing(
                "a_3",
                format!("Cozy Corner {}", dest),
                (base * 0.65).floor(),
                4.2,
                "Old Town",
                &["Kitchenette", "Self Check-in", "WiFi"],
            ),
        ])
    }

    async fn search_food(&self, destination: &str) -> Result<Vec<FoodOption>> {
        let india = self.is_indian(destination);
        tracing::debug!("Stub food search in {} (india={})", destination, india);

        let pick = |indian: &str, other: &str| {
            if india {
                indian.to_string()
            } else {
                other.to_string()
            }
        };

        Ok(vec![
            FoodOption {
                id: "f_1".to_string(),
                name: pick("The Spice Route", "Le Gourmet Parisien"),
                cuisine: pick("Indian Fine Dining", "French Contemporary"),
                dining_type: "Fine Dining".to_string(),
                location: "City Center".to_string(),
                cost_per_person: if india { price(2500, 5000) } else { price(80, 150) },
                rating: 4.9,
                booked: false,
            },
            FoodOption {
                id: "f_2".to_string(),
                name: pick("Coastal Flavors", "The Local Bistro"),
                cuisine: pick("Seafood & Curry", "Modern Fusion"),
                dining_type: "Casual Dining".to_string(),
                location: "Waterfront".to_string(),
                cost_per_person: if india { price(1000, 2000) } else { price(40, 80) },
                rating: 4.6,
                booked: false,
            },
            FoodOption {
                id: "f_3".to_string(),
                name: pick("Chaat Bazaar", "Street Corner Eats"),
                cuisine: pick("Street Food & Snacks", "Local Delicacies"),
                dining_type: "Street Food".to_string(),
                location: "Market Square".to_string(),
                cost_per_person: if india { price(300, 800) } else { price(15, 30) },
                rating: 4.7,
                booked: false,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StubCatalog {
        StubCatalog::new().unwrap()
    }

    fn transport(from: &str, to: &str, mode: TransportMode) -> TransportQuery {
        TransportQuery {
            from: from.to_string(),
            to: to.to_string(),
            date: "2026-12-20".to_string(),
            mode,
        }
    }

    #[tokio::test]
    async fn test_indian_flights_use_domestic_carriers_and_rupee_prices() {
        let options = catalog()
            .search_transport(&transport("Mumbai", "Goa, India", TransportMode::Flight))
            .await
            .unwrap();

        assert_eq!(options.len(), 3);
        assert_eq!(options[0].provider, "IndiGo");
        assert!((4000.0..=12000.0).contains(&options[0].cost));
        assert_eq!(options[1].cost, (options[0].cost * 1.2).floor());
        assert!(options.iter().all(|o| o.mode == "flight" && !o.booked));
    }

    #[tokio::test]
    async fn test_international_train_prices() {
        let options = catalog()
            .search_transport(&transport("Paris", "London", TransportMode::Train))
            .await
            .unwrap();
        assert_eq!(options[0].provider, "EuroStar");
        assert!((50.0..=150.0).contains(&options[0].cost));
    }

    #[tokio::test]
    async fn test_accommodation_names_and_bands() {
        let query = StayQuery {
            destination: "Goa".to_string(),
            stay_type: "hotel".to_string(),
            budget_level: AccommodationBudget::Luxury,
        };
        let listings = catalog().search_accommodation(&query).await.unwrap();

        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].name, "Grand Goa Hotel");
        assert_eq!(listings[2].name, "Cozy Corner Goa");
        assert!((15000.0..=35000.0).contains(&listings[0].cost_per_night));

        let airbnb = StayQuery {
            destination: "Lisbon".to_string(),
            stay_type: "airbnb".to_string(),
            budget_level: AccommodationBudget::Budget,
        };
        let listings = catalog().search_accommodation(&airbnb).await.unwrap();
        assert_eq!(listings[0].name, "Grand Lisbon Villa");
        assert!((60.0..=100.0).contains(&listings[0].cost_per_night));
    }

    #[tokio::test]
    async fn test_food_options_follow_destination() {
        let indian = catalog().search_food("Hyderabad").await.unwrap();
        assert_eq!(indian[0].name, "The Spice Route");
        let elsewhere = catalog().search_food("Rome").await.unwrap();
        assert_eq!(elsewhere[0].name, "Le Gourmet Parisien");
        assert!((15.0..=30.0).contains(&elsewhere[2].cost_per_person));
    }

    #[test]
    fn test_stay_listing_wire_format() {
        let listing = StayListing {
            id: "a_1".to_string(),
            name: "Grand Goa Hotel".to_string(),
            stay_type: "hotel".to_string(),
            cost_per_night: 5000.0,
            rating: 4.8,
            address: "City Center".to_string(),
            amenities: vec!["Pool".to_string()],
            booked: false,
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["costPerNight"], 5000.0);
        assert_eq!(json["type"], "hotel");
    }
}
