//! YouTube transcript collaborator.
//!
//! Posts `{url, language}` to an external transcript service and joins the
//! returned segments into plain grounding text.

use std::time::Duration;

use tracing::debug;

use crate::language::is_language_code;
use crate::AiError;

/// Transcript service client.
pub struct TranscriptClient {
    endpoint: String,
    http: reqwest::Client,
}

impl TranscriptClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    /// Fetch the transcript of `video_url` in `language` as one string.
    pub async fn fetch(&self, video_url: &str, language: &str) -> Result<String, AiError> {
        validate_request(video_url, language)?;

        debug!(video = video_url, language, "transcript request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({ "url": video_url, "language": language }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let details = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|json| json["error"].as_str().map(String::from))
                .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));
            return Err(AiError::ApiError(format!(
                "Failed to fetch transcript: {details}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;
        join_segments(&json)
    }
}

fn validate_request(video_url: &str, language: &str) -> Result<(), AiError> {
    if video_url.trim().is_empty() {
        return Err(AiError::InvalidInput("No URL provided".into()));
    }
    reqwest::Url::parse(video_url)
        .map_err(|_| AiError::InvalidInput("Invalid URL format".into()))?;
    if !is_language_code(language) {
        return Err(AiError::InvalidInput(
            "Invalid language code. Must be a 2-letter ISO code".into(),
        ));
    }
    Ok(())
}

/// Join `transcript[].text` with single spaces.
pub(crate) fn join_segments(json: &serde_json::Value) -> Result<String, AiError> {
    if let Some(error) = json["error"].as_str() {
        return Err(AiError::ApiError(error.to_string()));
    }
    let segments = json["transcript"]
        .as_array()
        .ok_or_else(|| AiError::ParseError("no transcript in response".into()))?;
    Ok(segments
        .iter()
        .filter_map(|segment| segment["text"].as_str())
        .collect::<Vec<_>>()
        .join(" "))
}
