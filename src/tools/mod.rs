//! Tools module for Wanderlust
//!
//! The model may only call the three trip lookups. Names map onto the closed
//! [`TripTool`] enumeration; anything else is rejected by the registry.

pub mod accommodation;
pub mod catalog;
pub mod food;
pub mod transport;

pub use accommodation::SearchAccommodationTool;
pub use catalog::{StayListing, StayQuery, StubCatalog, TransportQuery, TravelCatalog};
pub use food::SearchFoodTool;
pub use transport::SearchTransportTool;

use crate::error::{Result, WanderlustError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the transport lookup tool
pub const SEARCH_TRANSPORT: &str = "search_transport";
/// Name of the accommodation lookup tool
pub const SEARCH_ACCOMMODATION: &str = "search_accommodation";
/// Name of the dining lookup tool
pub const SEARCH_FOOD: &str = "search_food";

/// The closed set of tools offered to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripTool {
    /// `search_transport(from, to, date, mode?)`
    SearchTransport,
    /// `search_accommodation(destination, type, budgetLevel?)`
    SearchAccommodation,
    /// `search_food(destination)`
    SearchFood,
}

impl TripTool {
    /// Every tool, in manifest order
    pub const ALL: [TripTool; 3] = [
        TripTool::SearchTransport,
        TripTool::SearchAccommodation,
        TripTool::SearchFood,
    ];

    /// Name the model uses to call the tool
    pub fn name(&self) -> &'static str {
        match self {
            TripTool::SearchTransport => SEARCH_TRANSPORT,
            TripTool::SearchAccommodation => SEARCH_ACCOMMODATION,
            TripTool::SearchFood => SEARCH_FOOD,
        }
    }

    /// Resolve a tool name; unknown names are `None`
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::tools::TripTool;
    ///
    /// assert_eq!(TripTool::from_name("search_food"), Some(TripTool::SearchFood));
    /// assert_eq!(TripTool::from_name("book_flight"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }
}

impl fmt::Display for TripTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a tool execution
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Whether the tool execution succeeded
    pub success: bool,
    /// JSON output from the tool
    pub output: String,
    /// Error message if execution failed
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    /// Create a failed tool result
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
        }
    }

    /// JSON payload sent back to the model
    ///
    /// Failures become `{"error": "..."}` so the conversation can continue.
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::tools::ToolResult;
    ///
    /// let payload = ToolResult::error("Failed to fetch data").to_payload();
    /// assert_eq!(payload, r#"{"error":"Failed to fetch data"}"#);
    /// ```
    pub fn to_payload(&self) -> String {
        if self.success {
            self.output.clone()
        } else {
            serde_json::json!({
                "error": self.error.as_deref().unwrap_or("Unknown error")
            })
            .to_string()
        }
    }
}

/// Tool executor trait for implementing tool execution logic
///
/// # Examples
///
/// ```no_run
/// use wanderlust::tools::{ToolExecutor, ToolResult};
/// use wanderlust::error::Result;
/// use async_trait::async_trait;
/// use serde_json::Value;
///
/// struct EchoTool;
///
/// #[async_trait]
/// impl ToolExecutor for EchoTool {
///     fn tool_definition(&self) -> Value {
///         serde_json::json!({
///             "name": "search_food",
///             "description": "Echo",
///             "parameters": {"type": "object", "properties": {}}
///         })
///     }
///
///     async fn execute(&self, args: Value) -> Result<ToolResult> {
///         Ok(ToolResult::success(args.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Returns the tool definition as `{name, description, parameters}`
    fn tool_definition(&self) -> serde_json::Value;

    /// Executes the tool with the given arguments
    ///
    /// # Errors
    ///
    /// Returns error if the arguments are malformed or the lookup fails
    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult>;
}

/// Name→handler table for the trip tools
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<TripTool, Arc<dyn ToolExecutor>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all three trip tools backed by one catalog
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use wanderlust::tools::{StubCatalog, ToolRegistry};
    ///
    /// let registry = ToolRegistry::trip_tools(Arc::new(StubCatalog::new().unwrap()));
    /// assert_eq!(registry.len(), 3);
    /// ```
    pub fn trip_tools(catalog: Arc<dyn TravelCatalog>) -> Self {
        let mut registry = Self::new();
        registry.register(
            TripTool::SearchTransport,
            Arc::new(SearchTransportTool::new(Arc::clone(&catalog))),
        );
        registry.register(
            TripTool::SearchAccommodation,
            Arc::new(SearchAccommodationTool::new(Arc::clone(&catalog))),
        );
        registry.register(TripTool::SearchFood, Arc::new(SearchFoodTool::new(catalog)));
        registry
    }

    /// Register (or replace) the handler for a tool
    pub fn register(&mut self, tool: TripTool, executor: Arc<dyn ToolExecutor>) {
        self.tools.insert(tool, executor);
    }

    /// Look up the handler for a tool name
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::UnknownTool` if the name is not a trip tool
    /// or no handler is registered for it
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn ToolExecutor>> {
        TripTool::from_name(name)
            .and_then(|tool| self.tools.get(&tool).cloned())
            .ok_or_else(|| WanderlustError::UnknownTool(name.to_string()).into())
    }

    /// Tool definitions in manifest order
    pub fn all_definitions(&self) -> Vec<serde_json::Value> {
        TripTool::ALL
            .iter()
            .filter_map(|tool| self.tools.get(tool))
            .map(|executor| executor.tool_definition())
            .collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
