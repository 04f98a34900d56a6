//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout (must be 1..=600 seconds)")]
    InvalidTimeout,

    #[error(
        "Request timeout of {configured_secs}s is shorter than the {required_secs}s the pipeline may need"
    )]
    RequestTimeoutTooShort {
        configured_secs: u64,
        required_secs: u64,
    },

    #[error("Invalid log format: {0} (expected \"text\" or \"json\")")]
    InvalidLogFormat(String),

    #[error("Invalid temperature (must be 0.0..=2.0)")]
    InvalidTemperature,

    #[error("Invalid fact-check attempt limit (must be 1..=20)")]
    InvalidFactCheckAttempts,

    #[error("Invalid oracle timeout (must be 1..=300 seconds)")]
    InvalidOracleTimeout,

    #[error("Seed question must not be empty")]
    EmptySeedQuestion,

    #[error("Invalid speech upload limit")]
    InvalidUploadLimit,

    #[error("File storage requires a data directory")]
    MissingDataDir,
}
