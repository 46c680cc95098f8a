//! Single-shot assistant queries
//!
//! Three stateless helpers next to the planner: image/video analysis, long
//! form reasoning with a thinking budget, and map-grounded questions. Each is
//! one request with no tool loop.

use crate::config::{AssistConfig, Config};
use crate::error::Result;
use crate::providers::{create_provider, GenerateRequest, Grounding, InlineImage, LatLng, Provider};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Text returned when an analysis comes back empty
pub const NO_ANALYSIS: &str = "No analysis generated.";
/// Text returned when a reasoning query comes back empty
pub const NO_RESPONSE: &str = "No response generated.";

/// Answer to a map-grounded query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapsAnswer {
    /// Answer text; empty when the model returned none
    pub text: String,
    /// Grounding chunks (places, links) as reported by the provider
    pub chunks: Vec<serde_json::Value>,
}

/// Runs single-shot queries against one provider
pub struct Assistant {
    provider: Arc<dyn Provider>,
    settings: AssistConfig,
    model_overrides: bool,
}

impl Assistant {
    /// Create an assistant that sends the configured model names
    pub fn new(provider: Arc<dyn Provider>, settings: AssistConfig) -> Self {
        Self {
            provider,
            settings,
            model_overrides: true,
        }
    }

    /// Let the provider use its own model for every query
    pub fn without_model_overrides(mut self) -> Self {
        self.model_overrides = false;
        self
    }

    /// Create an assistant for the configured provider
    ///
    /// The per-query model names are Gemini models, so they are only sent
    /// when Gemini is the provider.
    ///
    /// # Errors
    ///
    /// Returns error if the provider cannot be created
    pub fn from_config(config: &Config) -> Result<Self> {
        let assistant = Self::new(create_provider(config)?, config.assist.clone());
        if config.provider.provider_type == "gemini" {
            Ok(assistant)
        } else {
            Ok(assistant.without_model_overrides())
        }
    }

    fn request(&self, prompt: &str, model: &str) -> GenerateRequest {
        let request = GenerateRequest::new(prompt);
        if self.model_overrides {
            request.with_model(model)
        } else {
            request
        }
    }

    /// Describe an image or video frame according to a prompt
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    pub async fn analyze_content(&self, image: InlineImage, prompt: &str) -> Result<String> {
        info!("Analyzing {} content", image.mime_type);
        let request = self
            .request(prompt, &self.settings.analysis_model)
            .with_image(image);
        let response = self.provider.generate(&request).await?;
        Ok(response.text.unwrap_or_else(|| NO_ANALYSIS.to_string()))
    }

    /// Answer a question with an extended reasoning budget
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    pub async fn deep_think(&self, query: &str) -> Result<String> {
        debug!(
            "Deep think query with thinking budget {}",
            self.settings.thinking_budget
        );
        let request = self
            .request(query, &self.settings.reasoning_model)
            .with_thinking_budget(self.settings.thinking_budget);
        let response = self.provider.generate(&request).await?;
        Ok(response.text.unwrap_or_else(|| NO_RESPONSE.to_string()))
    }

    /// Answer a question grounded in map data
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider has no map grounding
    pub async fn maps_query(&self, query: &str, location: Option<LatLng>) -> Result<MapsAnswer> {
        debug!("Maps query near {:?}", location);
        let request = self
            .request(query, &self.settings.maps_model)
            .with_grounding(Grounding::Maps { location });
        let response = self.provider.generate(&request).await?;
        Ok(MapsAnswer {
            text: response.text.unwrap_or_default(),
            chunks: response.grounding_chunks,
        })
    }
}
