//! Full configuration validation.
//!
//! Each section has its own check; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod sections;


use crate::schema::NexgConfig;
use nexg_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &NexgConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_model(&mut errors, config);
    sections::validate_safety(&mut errors, config);
    sections::validate_reveal(&mut errors, config);
    sections::validate_services(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
