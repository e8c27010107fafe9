//! NexG configuration system.
//!
//! Provides TOML-based configuration for the model endpoint, content-safety
//! thresholds, the typewriter reveal, auxiliary services, and logging. All
//! sections use sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nexg_config::{load_config, credentials};
//!
//! let config = load_config().expect("failed to load config");
//! let api_key = credentials::api_key_from_env().expect("no API key");
//! println!("model {} ({} chars of key)", config.model.name, api_key.len());
//! ```

pub mod credentials;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    HarmCategory, LogLevel, LoggingConfig, ModelConfig, NexgConfig, RevealConfig, SafetyConfig,
    SafetyThreshold, ServicesConfig,
};

use nexg_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creates a default
/// if none exists, and validates the result.
pub fn load_config() -> Result<NexgConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path (the `--config` override).
pub fn load_config_from(path: &Path) -> Result<NexgConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
