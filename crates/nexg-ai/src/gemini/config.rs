//! Gemini API client configuration.

use std::time::Duration;

use nexg_config::{HarmCategory, NexgConfig, SafetyThreshold};

/// One content-safety rule sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: SafetyThreshold,
}

/// Gemini API client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
    pub candidate_count: u32,
    pub safety: Vec<SafetySetting>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("top_k", &self.top_k)
            .field("top_p", &self.top_p)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("candidate_count", &self.candidate_count)
            .field("safety", &self.safety)
            .finish()
    }
}

impl GeminiConfig {
    /// Config with the default generation parameters and safety settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(api_key, &NexgConfig::default())
    }

    /// Build from the `[model]` and `[safety]` sections of a loaded config.
    pub fn from_config(api_key: impl Into<String>, config: &NexgConfig) -> Self {
        let model = &config.model;
        let safety = config
            .safety
            .categories
            .iter()
            .map(|&category| SafetySetting {
                category,
                threshold: config.safety.threshold,
            })
            .collect();

        Self {
            api_key: api_key.into(),
            model: model.name.clone(),
            api_base: model.api_base.clone(),
            temperature: model.temperature,
            top_k: model.top_k,
            top_p: model.top_p,
            max_output_tokens: model.max_output_tokens,
            candidate_count: model.candidate_count,
            safety,
            connect_timeout: Duration::from_secs(model.connect_timeout_secs.into()),
            request_timeout: Duration::from_secs(model.request_timeout_secs.into()),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}
