//! Model endpoint and generation parameters.

use serde::{Deserialize, Serialize};

/// Language-model endpoint configuration.
///
/// Generation parameters are fixed for the whole process; they are not
/// varied per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name appended to `api_base` (e.g. `gemini-2.0-flash`).
    pub name: String,
    pub api_base: String,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Top-k sampling (valid range: 1-100).
    pub top_k: u32,
    /// Nucleus sampling (valid range: 0.0-1.0).
    pub top_p: f64,
    /// Maximum output length in tokens (valid range: 1-8192).
    pub max_output_tokens: u32,
    /// Number of candidates requested. Only the first is ever read.
    pub candidate_count: u32,
    pub connect_timeout_secs: u32,
    pub request_timeout_secs: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-2.0-flash".into(),
            api_base: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            temperature: 0.5,
            top_k: 1,
            top_p: 0.8,
            max_output_tokens: 1024,
            candidate_count: 1,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
