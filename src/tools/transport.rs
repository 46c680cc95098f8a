//! search_transport tool
//!
//! Finds three ways to travel between two places.

use crate::error::Result;
use crate::planner::input::TransportMode;
use crate::tools::catalog::{TransportQuery, TravelCatalog};
use crate::tools::{ToolExecutor, ToolResult, SEARCH_TRANSPORT};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct SearchTransportParams {
    from: String,
    to: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    mode: Option<String>,
}

/// Transport lookup backed by a travel catalog
pub struct SearchTransportTool {
    catalog: Arc<dyn TravelCatalog>,
}

impl SearchTransportTool {
    /// Create the tool over a catalog
    pub fn new(catalog: Arc<dyn TravelCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for SearchTransportTool {
    fn tool_definition(&self) -> serde_json::Value {
        json!({
            "name": SEARCH_TRANSPORT,
            "description": "Search for 3 transport options between two locations.",
            "parameters": {
                "type": "object",
                "properties": {
                    "from": {"type": "string", "description": "Origin city"},
                    "to": {"type": "string", "description": "Destination city"},
                    "date": {"type": "string", "description": "Travel date (YYYY-MM-DD)"},
                    "mode": {"type": "string", "description": "flight, train, bus or car"}
                },
                "required": ["from", "to", "date"]
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let params: SearchTransportParams = serde_json::from_value(args)?;

        // Unknown or missing modes are priced as car hire.
        let mode = params
            .mode
            .as_deref()
            .and_then(TransportMode::from_name)
            .unwrap_or(TransportMode::Car);

        let query = TransportQuery {
            from: params.from,
            to: params.to,
            date: params.date,
            mode,
        };
        let options = self.catalog.search_transport(&query).await?;

        Ok(ToolResult::success(json!({ "options": options }).to_string()))
    }
}
