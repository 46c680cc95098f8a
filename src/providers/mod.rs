//! Provider module for Wanderlust
//!
//! This module contains the model provider abstraction and implementations
//! for Google Gemini and Ollama.

pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{
    validate_message_sequence, CompletionResponse, FunctionCall, GenerateRequest,
    GenerateResponse, Grounding, InlineImage, LatLng, Message, Provider, TokenUsage, ToolCall,
};
pub use gemini::{GeminiProvider, DEFAULT_GEMINI_API_BASE};
pub use ollama::OllamaProvider;

use crate::config::Config;
use crate::error::{Result, WanderlustError};
use std::sync::Arc;

/// Create the configured provider
///
/// The planner temperature is applied to the provider. For Gemini the API key
/// is resolved here, so a missing key fails before any request is sent.
///
/// # Errors
///
/// - `WanderlustError::MissingCredentials` if Gemini is selected and no key
///   is available
/// - `WanderlustError::Provider` if the provider type is unknown
///
/// # Examples
///
/// ```
/// use wanderlust::config::Config;
/// use wanderlust::providers::create_provider;
///
/// let mut config = Config::default();
/// config.provider.provider_type = "ollama".to_string();
/// assert!(create_provider(&config).is_ok());
/// ```
pub fn create_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    create_provider_with_override(config, None)
}

/// Create a provider, optionally overriding the configured type
///
/// # Errors
///
/// Same as [`create_provider`]
pub fn create_provider_with_override(
    config: &Config,
    provider_override: Option<&str>,
) -> Result<Arc<dyn Provider>> {
    let provider_type = provider_override.unwrap_or(&config.provider.provider_type);
    let temperature = config.planner.temperature;

    match provider_type {
        "gemini" => {
            let gemini = config.provider.gemini.clone();
            let api_key = gemini.resolve_api_key().ok_or_else(|| {
                WanderlustError::MissingCredentials(format!(
                    "gemini (set {} or {})",
                    gemini.api_key_env,
                    crate::config::FALLBACK_API_KEY_ENV
                ))
            })?;
            Ok(Arc::new(
                GeminiProvider::new(gemini, api_key)?.with_temperature(temperature),
            ))
        }
        "ollama" => Ok(Arc::new(
            OllamaProvider::new(config.provider.ollama.clone())?.with_temperature(temperature),
        )),
        _ => Err(WanderlustError::Provider(format!(
            "Unknown provider type: {}",
            provider_type
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_invalid_type() {
        let mut config = Config::default();
        config.provider.provider_type = "invalid".to_string();
        assert!(create_provider(&config).is_err());
    }

    #[test]
    fn test_create_provider_ollama() {
        let mut config = Config::default();
        config.provider.provider_type = "ollama".to_string();
        assert!(create_provider(&config).is_ok());
    }

    #[test]
    fn test_create_gemini_with_inline_key() {
        let mut config = Config::default();
        config.provider.provider_type = "gemini".to_string();
        config.provider.gemini.api_key = Some("test-key".to_string());
        assert!(create_provider(&config).is_ok());
    }

    #[test]
    fn test_create_gemini_without_key_is_missing_credentials() {
        let mut config = Config::default();
        config.provider.gemini.api_key = None;
        config.provider.gemini.api_key_env = "WANDERLUST_TEST_UNSET_KEY_VAR".to_string();

        // The fallback variable may be set on a developer machine.
        if std::env::var(crate::config::FALLBACK_API_KEY_ENV).is_ok() {
            return;
        }

        let err = create_provider_with_override(&config, Some("gemini"))
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<WanderlustError>(),
            Some(WanderlustError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_override_wins_over_config() {
        let mut config = Config::default();
        config.provider.provider_type = "invalid".to_string();
        assert!(create_provider_with_override(&config, Some("ollama")).is_ok());
    }
}
