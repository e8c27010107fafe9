//! Multi-session conversation engine.
//!
//! The `Engine` owns every `ConversationSession`, tracks which one is
//! active, runs at most one model request and one reveal at a time, and
//! reports progress to subscribers through `EngineEvent`s.

mod chat;
mod engine;
mod events;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use engine::Engine;
pub use events::{EngineEvent, EventHub};
pub use types::{ConversationSession, EngineError, SessionSummary, SubmitOutcome, FALLBACK_REPLY};
