//! Wanderlust - agentic AI trip planner library
//!
//! This library provides the core functionality for Wanderlust: a planning
//! loop that lets a function-calling model look up transport, lodging and
//! dining options, extracts a structured trip plan from its final answer and
//! persists plans per user.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `agent`: Conversation state and the bounded tool-calling loop
//! - `providers`: AI provider abstraction and implementations (Gemini, Ollama)
//! - `tools`: Travel lookup tools, the catalog behind them and the registry
//! - `planner`: Trip parameters, the plan model, extraction and sessions
//! - `prompts`: The planning instruction block
//! - `assist`: Single-shot analysis, reasoning and maps queries
//! - `storage`: The trip persistence interface and its backends
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use wanderlust::{Config, TripInput, TripPlanner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let planner = TripPlanner::from_config(&config)?;
//!     let input = TripInput::new(
//!         "Delhi",
//!         "Goa, India",
//!         NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
//!         NaiveDate::from_ymd_opt(2026, 12, 24).unwrap(),
//!         80000.0,
//!     );
//!     let outcome = planner.plan(&input).await?;
//!     println!("{}", outcome.trip.destination);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod assist;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod planner;
pub mod prompts;
pub mod providers;
pub mod storage;
pub mod tools;

// Re-export commonly used types
pub use agent::{Agent, AgentOutcome};
pub use assist::Assistant;
pub use config::Config;
pub use error::{Result, WanderlustError};
pub use planner::{TripInput, TripPlanner, TripResult};
pub use storage::{MemoryTripStore, SqliteTripStore, TripStore};
