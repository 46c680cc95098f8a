//! search_accommodation tool

use crate::error::Result;
use crate::planner::input::AccommodationBudget;
use crate::tools::catalog::{StayQuery, TravelCatalog};
use crate::tools::{ToolExecutor, ToolResult, SEARCH_ACCOMMODATION};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchAccommodationParams {
    destination: String,
    #[serde(rename = "type", default = "default_stay_type")]
    stay_type: String,
    #[serde(default)]
    budget_level: Option<String>,
}

fn default_stay_type() -> String {
    "hotel".to_string()
}

/// Accommodation lookup backed by a travel catalog
pub struct SearchAccommodationTool {
    catalog: Arc<dyn TravelCatalog>,
}

impl SearchAccommodationTool {
    /// Create the tool over a catalog
    pub fn new(catalog: Arc<dyn TravelCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for SearchAccommodationTool {
    fn tool_definition(&self) -> serde_json::Value {
        json!({
            "name": SEARCH_ACCOMMODATION,
            "description": "Search for 3 accommodation options in a destination.",
            "parameters": {
                "type": "object",
                "properties": {
                    "destination": {"type": "string"},
                    "type": {"type": "string", "description": "hotel or airbnb"},
                    "budgetLevel": {"type": "string", "description": "budget, mid_range or luxury"}
                },
                "required": ["destination", "type"]
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let params: SearchAccommodationParams = serde_json::from_value(args)?;
        let query = StayQuery {
            destination: params.destination,
            stay_type: params.stay_type.to_ascii_lowercase(),
            budget_level: params
                .budget_level
                .as_deref()
                .map(AccommodationBudget::from_name)
                .unwrap_or(AccommodationBudget::Budget),
        };

        let listings = self.catalog.search_accommodation(&query).await?;
        Ok(ToolResult::success(json!({ "options": listings }).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::StubCatalog;

    #[tokio::test]
    async fn test_execute_passes_budget_level() {
        let tool = SearchAccommodationTool::new(Arc::new(StubCatalog::new().unwrap()));
        let result = tool
            .execute(json!({"destination": "Mumbai", "type": "Hotel", "budgetLevel": "luxury"}))
            .await
            .unwrap();

        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        let first = &payload["options"][0];
        assert_eq!(first["name"], "Grand Mumbai Hotel");
        assert_eq!(first["type"], "hotel");
        assert!(first["costPerNight"].as_f64().unwrap() >= 15000.0);
    }

    #[tokio::test]
    async fn test_missing_destination_is_error() {
        let tool = SearchAccommodationTool::new(Arc::new(StubCatalog::new().unwrap()));
        assert!(tool.execute(json!({"type": "hotel"})).await.is_err());
    }
}
