//! Error types for Wanderlust
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Wanderlust operations
///
/// The variants fall into three families that the planner treats very
/// differently:
///
/// - configuration errors (`Config`, `MissingCredentials`) are fatal and
///   raised before any request is sent
/// - tool errors (`Tool`, `UnknownTool`) are caught per call by the agent
///   and turned into an error payload for the model
/// - parse errors (`Parse`) end a planning session with no partial result
#[derive(Error, Debug)]
pub enum WanderlustError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Trip parameters failed validation
    #[error("Invalid trip input: {0}")]
    InvalidInput(String),

    /// Provider-related errors (API calls, authentication, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Tool execution errors
    #[error("Tool execution error: {0}")]
    Tool(String),

    /// The model asked for a tool that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The terminal response could not be turned into a trip plan
    #[error("Agent failed to generate valid JSON plan: {0}")]
    Parse(String),

    /// No stored trip with the given id
    #[error("Trip not found: {0}")]
    TripNotFound(String),

    /// A selection or booking referenced an option id that does not exist
    #[error("Option not found: {kind} option '{id}'")]
    OptionNotFound {
        /// Option category (transport, accommodation, food)
        kind: String,
        /// The id that was requested
        id: String,
    },

    /// Trip storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Wanderlust operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
