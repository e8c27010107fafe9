//! Conversation engine for NexG.
//!
//! Provides:
//! - The `AiClient` seam and a Gemini `generateContent` client
//! - Auxiliary collaborators: transcript fetch, translation, document
//!   extraction and analysis
//! - The typewriter `Revealer` with cooperative cancellation
//! - The multi-session conversation `Engine`
//! - Plain-text export of a session

pub mod documents;
pub mod export;
pub mod gemini;
pub mod language;
pub mod prompts;
pub mod reveal;
pub mod session;
pub mod transcript;

#[cfg(test)]
mod test_support;

use async_trait::async_trait;

pub use documents::{CommandDocumentExtractor, DocumentExtractor, HttpDocumentExtractor};
pub use gemini::{GeminiClient, GeminiConfig};
pub use reveal::{RevealOutcome, RevealPhase, RevealState, Revealer};
pub use session::{
    ConversationSession, Engine, EngineError, EngineEvent, SessionSummary, SubmitOutcome,
    FALLBACK_REPLY,
};
pub use transcript::TranscriptClient;

/// A single-shot, non-streaming language-model endpoint.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Send the ordered history and return the whole reply.
    ///
    /// `system` carries an optional system instruction (used for grounded
    /// question answering).
    async fn send_message(
        &self,
        messages: &[Message],
        system: Option<&str>,
    ) -> Result<AiResponse, AiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_reference: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            kind: MessageKind::Text,
            media_reference: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            kind: MessageKind::Text,
            media_reference: None,
        }
    }

    /// A user-sent attachment. `content` is the file name shown in history.
    pub fn media(kind: MessageKind, name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: name.into(),
            kind,
            media_reference: Some(reference.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Audio,
}

#[derive(Debug, Clone, Default)]
pub struct AiResponse {
    pub content: String,
    /// `finishReason` of the first candidate, when the endpoint sent one.
    pub finish_reason: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else if e.is_decode() {
            AiError::ParseError(e.to_string())
        } else {
            AiError::NetworkError(e.to_string())
        }
    }
}
