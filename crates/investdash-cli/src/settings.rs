//! Runtime configuration.
//!
//! Read from `INVESTDASH_*` environment variables (a `.env` file is loaded
//! first when present):
//!
//! * `INVESTDASH_STATE_DIR` - directory for the saved scenario (default: `.investdash`)
//! * `INVESTDASH_STORAGE_KEY` - key the scenario is stored under (default: `investment_record`)
//! * `INVESTDASH_API_KEY` - credential for the insight service (falls back to `GEMINI_API_KEY`)
//! * `INVESTDASH_MODEL` - generative model identifier
//! * `INVESTDASH_ENDPOINT` - base URL of the generate-content API
//! * `INVESTDASH_TIMEOUT_SECS` - insight request timeout (default: 30)
//! * `INVESTDASH_LOG_LEVEL` - trace, debug, info, warn, error (default: warn)

use std::path::PathBuf;

use investdash_core::insight::{InsightConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub state_dir: PathBuf,
    pub storage_key: String,
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(".investdash"),
            storage_key: "investment_record".to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let mut app: AppConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("INVESTDASH").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if app.api_key.is_none() {
            app.api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        }
        Ok(app)
    }

    pub fn insight_config(&self) -> InsightConfig {
        InsightConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}
