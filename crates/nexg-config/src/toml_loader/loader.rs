//! Reading `NexgConfig` from TOML.

use std::path::Path;

use nexg_common::ConfigError;
use tracing::{debug, info};

use crate::schema::NexgConfig;

use super::paths::{create_default_config, default_config_path, io_failure};

/// Parse the TOML file at `path`. Keys it omits take their defaults.
///
/// Values are not range-checked here; `crate::load_config_from` and
/// `crate::load_config` validate the result.
pub fn load_from_path(path: &Path) -> Result<NexgConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(|e| io_failure("read", path, e))?;
    let config: NexgConfig = toml::from_str(&raw)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), model = %config.model.name, "config parsed");
    Ok(config)
}

/// Load from the platform path, writing a default file on first run.
pub fn load_default() -> Result<NexgConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "first run, creating config");
            create_default_config(&path)?;
            Ok(NexgConfig::default())
        }
        other => other,
    }
}
