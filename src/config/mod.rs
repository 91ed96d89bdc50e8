//! Configuration management for tubefetch
//!
//! Settings are layered, lowest priority first:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! # Environment Variables
//!
//! Any key can be overridden with `TUBEFETCH__<section>__<key>`, for example
//! `TUBEFETCH__API__BASE_URL=http://downloads.internal:8000` or
//! `TUBEFETCH__API__POLL_INTERVAL_MS=500`.
//!
//! # Configuration File
//!
//! By default the configuration is read from `config/tubefetch.toml`. The
//! `TUBEFETCH_CONFIG` environment variable points it elsewhere.

mod models;
mod sources;
mod validation;

pub use models::{ApiConfig, Config, DownloadConfig, UiConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from the default file location and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
