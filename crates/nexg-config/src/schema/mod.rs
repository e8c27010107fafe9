//! Configuration schema types.
//!
//! Every section derives `Default` and is marked `#[serde(default)]`, so a
//! config file only needs the keys it wants to override.

mod logging;
mod model;
mod reveal;
mod safety;
mod services;

use serde::{Deserialize, Serialize};

pub use logging::{LogLevel, LoggingConfig};
pub use model::ModelConfig;
pub use reveal::RevealConfig;
pub use safety::{HarmCategory, SafetyConfig, SafetyThreshold};
pub use services::ServicesConfig;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NexgConfig {
    pub model: ModelConfig,
    pub safety: SafetyConfig,
    pub reveal: RevealConfig,
    pub services: ServicesConfig,
    pub logging: LoggingConfig,
}
