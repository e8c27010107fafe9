//! Typewriter reveal of an already-received reply.
//!
//! The full text is known up front; the revealer only paces how much of it
//! is shown. Each tick waits `interval`, extends the visible prefix by one
//! code point, and publishes it. A `CancellationToken` stops the reveal at
//! the next tick boundary, at which point the full text is published.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Lifecycle of one reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Revealing,
    Completed,
    Cancelled,
}

/// How a reveal ended. Both outcomes leave the full text available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Completed,
    Cancelled,
}

/// Transient progress of one reveal. Never stored in a session.
#[derive(Debug, Clone)]
pub struct RevealState {
    target_text: String,
    /// Revealed length in code points.
    revealed_prefix_length: usize,
    /// Byte offset matching `revealed_prefix_length`.
    revealed_bytes: usize,
    cancelled: bool,
}

impl RevealState {
    pub fn new(target_text: impl Into<String>) -> Self {
        Self {
            target_text: target_text.into(),
            revealed_prefix_length: 0,
            revealed_bytes: 0,
            cancelled: false,
        }
    }

    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    pub fn revealed_prefix_length(&self) -> usize {
        self.revealed_prefix_length
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Currently visible prefix.
    pub fn prefix(&self) -> &str {
        &self.target_text[..self.revealed_bytes]
    }

    pub fn is_complete(&self) -> bool {
        self.revealed_bytes == self.target_text.len()
    }

    pub fn phase(&self) -> RevealPhase {
        if self.cancelled {
            RevealPhase::Cancelled
        } else if self.is_complete() {
            RevealPhase::Completed
        } else {
            RevealPhase::Revealing
        }
    }

    /// Reveal one more code point. Returns `false` once nothing is left.
    pub fn advance(&mut self) -> bool {
        match self.target_text[self.revealed_bytes..].chars().next() {
            Some(c) => {
                self.revealed_bytes += c.len_utf8();
                self.revealed_prefix_length += 1;
                true
            }
            None => false,
        }
    }

    /// Jump to the end and mark the reveal cancelled.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.revealed_bytes = self.target_text.len();
        self.revealed_prefix_length = self.target_text.chars().count();
    }
}

/// Paces reveals at a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct Revealer {
    interval: Duration,
}

impl Revealer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Reveal `target`, calling `publish` with every visible prefix.
    ///
    /// Publishes the empty prefix first, so an uncancelled reveal of N code
    /// points publishes exactly N + 1 times, the last being the full text.
    /// Cancellation publishes the full text once more and returns.
    pub async fn run(
        &self,
        target: &str,
        stop: &CancellationToken,
        mut publish: impl FnMut(&str),
    ) -> RevealOutcome {
        let mut state = RevealState::new(target);
        publish(state.prefix());

        while !state.is_complete() {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = stop.cancelled() => {}
            }
            if stop.is_cancelled() {
                state.cancel();
                publish(state.prefix());
                return RevealOutcome::Cancelled;
            }
            state.advance();
            publish(state.prefix());
        }

        RevealOutcome::Completed
    }
}

impl Default for Revealer {
    fn default() -> Self {
        Self::new(Duration::from_millis(5))
    }
}
