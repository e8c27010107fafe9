//! AiClient trait implementation for GeminiClient.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{AiClient, AiError, AiResponse, Message};

use super::client::{error_detail, GeminiClient};

#[async_trait]
impl AiClient for GeminiClient {
    async fn send_message(
        &self,
        messages: &[Message],
        system: Option<&str>,
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(messages, system);
        let url = self.api_url();

        debug!(
            model = %self.config.model,
            messages = messages.len(),
            grounded = system.is_some(),
            "Gemini API request"
        );

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!(
                "HTTP {status}: {}",
                error_detail(&text)
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        let parsed = self.parse_response(&json);
        if parsed.content.is_empty() {
            warn!(
                finish_reason = parsed.finish_reason.as_deref().unwrap_or("none"),
                "Gemini returned no text"
            );
        }
        Ok(parsed)
    }
}

impl GeminiClient {
    /// Send a one-word request to confirm the key and model are usable.
    pub async fn verify(&self) -> Result<(), AiError> {
        self.send_message(&[Message::user("Hello")], None)
            .await
            .map(|_| ())
    }
}
