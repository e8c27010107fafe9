//! Gemini API client struct, request building, and response parsing.

use crate::{AiError, AiResponse, Message, Role};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(
        &self,
        messages: &[Message],
        system: Option<&str>,
    ) -> serde_json::Value {
        let contents: Vec<_> = messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": msg.content }]
                })
            })
            .collect();

        let safety_settings: Vec<_> = self
            .config
            .safety
            .iter()
            .map(|s| {
                serde_json::json!({
                    "category": s.category.as_api_str(),
                    "threshold": s.threshold.as_api_str(),
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "temperature": self.config.temperature,
                "topK": self.config.top_k,
                "topP": self.config.top_p,
                "maxOutputTokens": self.config.max_output_tokens,
                "candidateCount": self.config.candidate_count,
            },
            "safetySettings": safety_settings,
        });

        if let Some(system) = system {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system }]
            });
        }

        body
    }

    /// Parse a Gemini response. A missing text path is an empty reply.
    pub(crate) fn parse_response(&self, json: &serde_json::Value) -> AiResponse {
        let first = &json["candidates"][0];
        AiResponse {
            content: first["content"]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            finish_reason: first["finishReason"].as_str().map(String::from),
        }
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text.
pub(crate) fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
