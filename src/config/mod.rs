//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DRAFTWISE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use draftwise::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod features;
mod pipeline;
mod server;
mod speech;
mod storage;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use pipeline::PipelineConfig;
pub use server::{Environment, ServerConfig};
pub use speech::SpeechConfig;
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat-completion provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Speech-to-text / text-to-speech
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Conversation engine and finalization pipeline
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Conversation persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DRAFTWISE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DRAFTWISE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DRAFTWISE__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DRAFTWISE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.speech.validate()?;
        self.pipeline.validate()?;
        self.storage.validate()?;

        let required_secs = self.pipeline.worst_case_request_secs();
        if self.server.request_timeout_secs < required_secs {
            return Err(ValidationError::RequestTimeoutTooShort {
                configured_secs: self.server.request_timeout_secs,
                required_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
