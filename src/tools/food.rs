//! search_food tool

use crate::error::Result;
use crate::tools::catalog::TravelCatalog;
use crate::tools::{ToolExecutor, ToolResult, SEARCH_FOOD};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct SearchFoodParams {
    destination: String,
}

/// Dining lookup backed by a travel catalog
pub struct SearchFoodTool {
    catalog: Arc<dyn TravelCatalog>,
}

impl SearchFoodTool {
    /// Create the tool over a catalog
    pub fn new(catalog: Arc<dyn TravelCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for SearchFoodTool {
    fn tool_definition(&self) -> serde_json::Value {
        json!({
            "name": SEARCH_FOOD,
            "description": "Search for 3 popular food/dining options in a destination.",
            "parameters": {
                "type": "object",
                "properties": {
                    "destination": {"type": "string"}
                },
                "required": ["destination"]
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let params: SearchFoodParams = serde_json::from_value(args)?;
        let options = self.catalog.search_food(&params.destination).await?;
        Ok(ToolResult::success(json!({ "options": options }).to_string()))
    }
}
