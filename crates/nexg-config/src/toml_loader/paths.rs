//! Where the config file lives, and writing the documented default.

use std::path::{Path, PathBuf};

use nexg_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "nexg";
const FILE_NAME: &str = "config.toml";

/// `<platform config dir>/nexg/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented default config to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_failure("create", dir, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| io_failure("write", path, e))?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}

pub(super) fn io_failure(action: &str, path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!("cannot {action} {}: {e}", path.display()))
}
