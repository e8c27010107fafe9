//! Session types, engine errors, and concurrency guards.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use nexg_common::SessionId;

use crate::reveal::RevealOutcome;
use crate::Message;

/// Assistant reply stored when the model request fails.
pub const FALLBACK_REPLY: &str = "I apologize, but I encountered an error. Please try again.";

/// Title given to every new session.
pub(crate) const DEFAULT_TITLE: &str = "New Chat";

/// One independent conversation thread.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub id: SessionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    /// Transcript or document text the conversation is about, if any.
    pub grounding: Option<String>,
    /// Creation order, used to pick the most recent session.
    pub(crate) seq: u64,
}

impl ConversationSession {
    pub(crate) fn new(seq: u64) -> Self {
        Self {
            id: SessionId::new(),
            title: DEFAULT_TITLE.to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
            grounding: None,
            seq,
        }
    }

    pub fn summary(&self, active: bool) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            message_count: self.messages.len(),
            grounded: self.grounding.is_some(),
            active,
        }
    }
}

/// Lightweight listing entry for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
    pub grounded: bool,
    pub active: bool,
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The reply was revealed and stored in the originating session.
    Delivered {
        text: String,
        reveal: RevealOutcome,
    },
    /// The originating session stopped being active (or was deleted) before
    /// the reply could be stored, so the reply was dropped.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("message is empty")]
    EmptyInput,
    #[error("a request or reveal is already in progress")]
    Busy,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("session not found: {0}")]
    NotFound(SessionId),
}

/// Guard that clears the `busy` flag on drop, ensuring it is always released
/// even if the future is cancelled or an early return occurs.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to acquire the busy lock. Returns `Busy` if already held.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, EngineError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(EngineError::Busy);
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
