//! Typewriter reveal settings.

use serde::{Deserialize, Serialize};

/// Reveal (typewriter) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Pause between revealed code points, in milliseconds (valid range: 0-1000).
    pub interval_ms: u64,
    /// Greeting revealed once at start-up. Never stored in a session.
    pub welcome_message: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5,
            welcome_message: "Hello! I'm NexG AI, your AI assistant powered by Next Generation. \
                              How can I help you today?"
                .into(),
        }
    }
}
