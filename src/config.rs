//! Configuration management for Wanderlust
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, WanderlustError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Wanderlust
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Gemini, Ollama)
    pub provider: ProviderConfig,
    /// Planning session behavior
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Single-shot assistant queries
    #[serde(default)]
    pub assist: AssistConfig,
    /// Trip storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Provider configuration
///
/// Specifies which AI provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model used for planning sessions
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Optional API base URL (useful for tests and local mocks)
    ///
    /// Defaults to `https://generativelanguage.googleapis.com/v1beta`.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Inline API key; takes precedence over the environment when set
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

/// Environment variable consulted when `api_key_env` is unset
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

impl GeminiConfig {
    /// Resolve the API key from config, the configured env var, or `API_KEY`
    ///
    /// Empty values are treated as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::config::GeminiConfig;
    ///
    /// let config = GeminiConfig {
    ///     api_key: Some("secret".to_string()),
    ///     ..GeminiConfig::default()
    /// };
    /// assert_eq!(config.resolve_api_key().as_deref(), Some("secret"));
    /// ```
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .or_else(|| std::env::var(FALLBACK_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: None,
            api_key_env: default_api_key_env(),
            api_key: None,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Planning session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum number of tool-dispatch rounds before the last response is
    /// taken as final
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Sampling temperature for the planning conversation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Overall session timeout in seconds; 0 disables the check
    #[serde(default)]
    pub timeout_seconds: u64,

    /// Reject structurally incomplete plans instead of logging a warning
    #[serde(default)]
    pub strict_validation: bool,
}

fn default_max_steps() -> usize {
    7
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            temperature: default_temperature(),
            timeout_seconds: 0,
            strict_validation: false,
        }
    }
}

/// Single-shot query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistConfig {
    /// Model used for image and video analysis
    #[serde(default = "default_pro_model")]
    pub analysis_model: String,

    /// Model used for long-form reasoning queries
    #[serde(default = "default_pro_model")]
    pub reasoning_model: String,

    /// Token budget granted to reasoning queries
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,

    /// Model used for location-grounded queries
    #[serde(default = "default_gemini_model")]
    pub maps_model: String,
}

fn default_pro_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_thinking_budget() -> u32 {
    32_768
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            analysis_model: default_pro_model(),
            reasoning_model: default_pro_model(),
            thinking_budget: default_thinking_budget(),
            maps_model: default_gemini_model(),
        }
    }
}

/// Trip storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite trips database; the user data dir is used when unset
    #[serde(default)]
    pub db_path: Option<String>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "gemini".to_string(),
                gemini: GeminiConfig::default(),
                ollama: OllamaConfig::default(),
            },
            planner: PlannerConfig::default(),
            assist: AssistConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WanderlustError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| WanderlustError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("WANDERLUST_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("WANDERLUST_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(ollama_host) = std::env::var("WANDERLUST_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Ok(ollama_model) = std::env::var("WANDERLUST_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        if let Ok(max_steps) = std::env::var("WANDERLUST_MAX_STEPS") {
            if let Ok(value) = max_steps.parse() {
                self.planner.max_steps = value;
            } else {
                tracing::warn!("Invalid WANDERLUST_MAX_STEPS: {}", max_steps);
            }
        }

        if let Ok(db_path) = std::env::var("WANDERLUST_TRIPS_DB") {
            tracing::debug!(db_path = %db_path, "Env override: WANDERLUST_TRIPS_DB");
            self.storage.db_path = Some(db_path);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(provider) = &cli.provider {
            self.provider.provider_type = provider.clone();
        }
        if let Some(max_steps) = cli.max_steps {
            self.planner.max_steps = max_steps;
        }
        if let Some(db) = &cli.db {
            self.storage.db_path = Some(db.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::Config` if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(WanderlustError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["gemini", "ollama"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(WanderlustError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.planner.max_steps == 0 {
            return Err(
                WanderlustError::Config("max_steps must be greater than 0".to_string()).into(),
            );
        }

        if self.planner.max_steps > 50 {
            return Err(WanderlustError::Config(
                "max_steps must be less than or equal to 50".to_string(),
            )
            .into());
        }

        if !(0.0..=2.0).contains(&self.planner.temperature) {
            return Err(WanderlustError::Config(
                "planner.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if let Some(api_base) = &self.provider.gemini.api_base {
            url::Url::parse(api_base).map_err(|e| {
                WanderlustError::Config(format!("Invalid gemini.api_base '{}': {}", api_base, e))
            })?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
