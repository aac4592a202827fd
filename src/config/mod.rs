//! Configuration management for vigocam
//!
//! Settings are layered:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Environment Variables
//!
//! Any setting can be overridden with `VIGOCAM__<section>__<key>`, e.g.
//! `VIGOCAM__DOWNLOAD__OUTPUT_DIR=/srv/cams` or
//! `VIGOCAM__CACHE__MAX_AGE_HOURS=6`.
//!
//! # Configuration File
//!
//! Loaded from `config/vigocam.toml` unless `VIGOCAM_CONFIG` points elsewhere.
//! The file is optional.

mod models;
mod sources;
mod validation;

pub use models::{
    CacheConfig, Config, DownloadConfig, ExportConfig, ScheduleConfig, SourceConfig,
};
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
    /// Load configuration from all sources (file + environment)
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

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }
}
