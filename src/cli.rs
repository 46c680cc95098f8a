//! Command-line interface definition for Wanderlust
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for planning trips, managing saved trips and the
//! single-shot assistant queries.

use crate::planner::{
    AccommodationBudget, AccommodationType, BookingPreference, BudgetType, Currency, ItemField,
    OptionKind, TransportMode,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// User id used when none is given
pub const DEFAULT_USER: &str = "traveler";

/// Wanderlust - agentic AI trip planner
///
/// Plans transport, lodging, dining and a day-by-day itinerary by letting a
/// function-calling model search for options.
#[derive(Parser, Debug, Clone)]
#[command(name = "wanderlust")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Override the provider from config (gemini, ollama)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Override the tool dispatch step limit
    #[arg(long, global = true)]
    pub max_steps: Option<usize>,

    /// Override the trips database path
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Wanderlust
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Plan a trip
    Plan(PlanArgs),

    /// Manage saved trips
    Trips {
        /// Trip management subcommand
        #[command(subcommand)]
        command: TripCommand,
    },

    /// Analyze an image or video frame
    Analyze {
        /// Path to the image file
        file: PathBuf,

        /// What to ask about the content
        #[arg(short, long, default_value = "Describe the travel vibe of this place.")]
        prompt: String,
    },

    /// Ask a question with an extended reasoning budget
    Think {
        /// The question
        query: String,
    },

    /// Ask a question grounded in map data
    Maps {
        /// The question
        query: String,

        /// Latitude of the user location
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the user location
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },
}

/// Trip parameters for `wanderlust plan`
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Origin city
    #[arg(long)]
    pub from: String,

    /// Destination
    #[arg(long)]
    pub to: String,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Budget amount
    #[arg(long)]
    pub budget: f64,

    /// Currency for all costs
    #[arg(long, value_enum, default_value_t = Currency::Usd)]
    pub currency: Currency,

    /// Whether the budget is total or per person
    #[arg(long, value_enum, default_value_t = BudgetType::Total)]
    pub budget_type: BudgetType,

    /// Number of travellers
    #[arg(long, default_value_t = 1)]
    pub people: u32,

    /// Preferred transport
    #[arg(long, value_enum, default_value_t = TransportMode::Flight)]
    pub transport: TransportMode,

    /// Accommodation type
    #[arg(long, value_enum, default_value_t = AccommodationType::Hotel)]
    pub stay: AccommodationType,

    /// Accommodation price band
    #[arg(long, value_enum, default_value_t = AccommodationBudget::MidRange)]
    pub stay_budget: AccommodationBudget,

    /// Booking behavior
    #[arg(long, value_enum, default_value_t = BookingPreference::SuggestOnly)]
    pub booking: BookingPreference,

    /// Include a tour guide
    #[arg(long)]
    pub tour_guide: bool,

    /// Free-form wishes for the trip
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Inspiration image
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Save the plan for this user
    #[arg(long)]
    pub save: bool,

    /// User id for saving
    #[arg(long, env = "WANDERLUST_USER", default_value = DEFAULT_USER)]
    pub user: String,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Trip management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TripCommand {
    /// List saved trips
    List {
        /// User id
        #[arg(long, env = "WANDERLUST_USER", default_value = DEFAULT_USER)]
        user: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one trip
    Show {
        /// Trip id
        trip_id: String,

        /// User id
        #[arg(long, env = "WANDERLUST_USER", default_value = DEFAULT_USER)]
        user: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change the selected option in a category
    Select {
        /// Trip id
        trip_id: String,

        /// Category (transport, accommodation, food)
        kind: OptionKind,

        /// Option id
        option_id: String,

        /// User id
        #[arg(long, env = "WANDERLUST_USER", default_value = DEFAULT_USER)]
        user: String,
    },

    /// Book one option in a category
    Book {
        /// Trip id
        trip_id: String,

        /// Category (transport, accommodation, food)
        kind: OptionKind,

        /// Option id
        option_id: String,

        /// User id
        #[arg(long, env = "WANDERLUST_USER", default_value = DEFAULT_USER)]
        user: String,
    },

    /// Edit an itinerary item
    Edit {
        /// Trip id
        trip_id: String,

        /// Day number, starting at 1
        #[arg(long)]
        day: usize,

        /// Item id
        #[arg(long)]
        item: String,

        /// Field to change (activity, notes)
        #[arg(long, default_value = "activity")]
        field: ItemField,

        /// New text
        #[arg(long)]
        value: String,

        /// User id
        #[arg(long, env = "WANDERLUST_USER", default_value = DEFAULT_USER)]
        user: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            provider: None,
            max_steps: None,
            db: None,
            command: Commands::Trips {
                command: TripCommand::List {
                    user: DEFAULT_USER.to_string(),
                    json: false,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.provider.is_none());
    }

    #[test]
    fn test_cli_parse_plan() {
        let cli = Cli::try_parse_from([
            "wanderlust",
            "plan",
            "--from",
            "Delhi",
            "--to",
            "Goa, India",
            "--start",
            "2026-12-20",
            "--end",
            "2026-12-24",
            "--budget",
            "80000",
            "--currency",
            "INR",
            "--people",
            "2",
            "--transport",
            "train",
            "--tour-guide",
        ])
        .unwrap();

        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.to, "Goa, India");
                assert_eq!(args.currency, Currency::Inr);
                assert_eq!(args.people, 2);
                assert_eq!(args.transport, TransportMode::Train);
                assert_eq!(args.stay_budget, AccommodationBudget::MidRange);
                assert!(args.tour_guide);
                assert_eq!(args.start, NaiveDate::from_ymd_opt(2026, 12, 20).unwrap());
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_parse_plan_rejects_bad_date() {
        let result = Cli::try_parse_from([
            "wanderlust", "plan", "--from", "A", "--to", "B", "--start", "20-12-2026", "--end",
            "2026-12-24", "--budget", "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_global_overrides() {
        let cli = Cli::try_parse_from([
            "wanderlust",
            "think",
            "Best month for Kyoto?",
            "--provider",
            "ollama",
            "--max-steps",
            "3",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.provider.as_deref(), Some("ollama"));
        assert_eq!(cli.max_steps, Some(3));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_trips_book() {
        let cli =
            Cli::try_parse_from(["wanderlust", "trips", "book", "trip-1", "stay", "a2", "--user", "ana"])
                .unwrap();
        match cli.command {
            Commands::Trips {
                command:
                    TripCommand::Book {
                        trip_id,
                        kind,
                        option_id,
                        user,
                    },
            } => {
                assert_eq!(trip_id, "trip-1");
                assert_eq!(kind, OptionKind::Accommodation);
                assert_eq!(option_id, "a2");
                assert_eq!(user, "ana");
            }
            _ => panic!("Expected Trips Book command"),
        }
    }

    #[test]
    fn test_cli_parse_trips_edit() {
        let cli = Cli::try_parse_from([
            "wanderlust", "trips", "edit", "trip-1", "--day", "2", "--item", "i_3", "--field",
            "notes", "--value", "Bring cash",
        ])
        .unwrap();
        match cli.command {
            Commands::Trips {
                command: TripCommand::Edit { day, field, value, .. },
            } => {
                assert_eq!(day, 2);
                assert_eq!(field, ItemField::Notes);
                assert_eq!(value, "Bring cash");
            }
            _ => panic!("Expected Trips Edit command"),
        }
    }

    #[test]
    fn test_cli_parse_maps_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "wanderlust",
            "maps",
            "tacos nearby",
            "--lat",
            "-33.45",
            "--lng",
            "-70.66",
        ])
        .unwrap();
        match cli.command {
            Commands::Maps { lat, lng, .. } => {
                assert_eq!(lat, Some(-33.45));
                assert_eq!(lng, Some(-70.66));
            }
            _ => panic!("Expected Maps command"),
        }
    }

    #[test]
    fn test_cli_maps_lat_requires_lng() {
        let result = Cli::try_parse_from(["wanderlust", "maps", "q", "--lat", "1.0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_unknown_option_kind() {
        let result =
            Cli::try_parse_from(["wanderlust", "trips", "select", "trip-1", "cruise", "c1"]);
        assert!(result.is_err());
    }
}
