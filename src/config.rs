// ABOUTME: Configuration module for the deck-slides application
// ABOUTME: Provides configuration settings and environment variable handling

use std::env;
use std::path::PathBuf;

use crate::errors::{DeckError, Result};
use crate::llm::LlmConfig;

/// Global configuration for the application
pub struct Config {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub template_dir: PathBuf,
    pub default_timeout_ms: u64,
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: env::var("DECK_API_KEY").ok(),
            api_base_url: "https://api.upstage.ai/v1/solar".to_string(),
            model: "solar-pro2-250909".to_string(),
            template_dir: PathBuf::from("templates"),
            default_timeout_ms: 30000, // 30 seconds
            max_retries: 2,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let api_key = env::var("DECK_API_KEY").ok();
        let api_base_url = env::var("DECK_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.upstage.ai/v1/solar".to_string());
        let model = env::var("DECK_MODEL").unwrap_or_else(|_| "solar-pro2-250909".to_string());
        let template_dir = env::var("TEMPLATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("templates"));
        let default_timeout_ms = env::var("DEFAULT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30000);
        let max_retries = env::var("DECK_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(2);

        Self {
            api_key,
            api_base_url,
            model,
            template_dir,
            default_timeout_ms,
            max_retries,
        }
    }

    /// Get a completion-client configuration from this config.
    /// Fails if no API key is set in the environment.
    pub fn llm_config(&self) -> Result<LlmConfig> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            DeckError::ConfigError("DECK_API_KEY not found in environment variables".to_string())
        })?;
        LlmConfig::new(
            api_key,
            &self.api_base_url,
            self.model.clone(),
            self.default_timeout_ms,
        )
    }
}
