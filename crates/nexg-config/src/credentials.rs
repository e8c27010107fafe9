//! API credential resolution from the process environment.

use nexg_common::ConfigError;

/// Environment variables checked for the model API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_AI_API_KEY"];

/// Resolve the model API key.
///
/// Resolution order:
/// 1. `GEMINI_API_KEY`
/// 2. `GOOGLE_AI_API_KEY`
///
/// Empty values are treated as unset.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    api_key_from(|name| std::env::var(name).ok())
}

pub(crate) fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingCredential(API_KEY_VARS.join(" or ")))
}
