//! Engine event fan-out.
//!
//! Subscribers get an unbounded channel so no reveal frame is ever dropped;
//! closed receivers are pruned on the next publish.

use std::sync::{Mutex, PoisonError};

use nexg_common::SessionId;
use tokio::sync::mpsc;

use crate::reveal::RevealOutcome;
use crate::Message;

/// Something observable happened inside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SessionCreated(SessionId),
    SessionDeleted(SessionId),
    ActiveChanged(SessionId),
    MessageAppended {
        session: SessionId,
        message: Message,
    },
    /// Current visible prefix of a reply. `session` is `None` for texts that
    /// are revealed without being stored (the start-up greeting).
    Partial {
        session: Option<SessionId>,
        text: String,
    },
    RevealFinished {
        session: Option<SessionId>,
        outcome: RevealOutcome,
    },
    RequestFailed {
        session: SessionId,
        detail: String,
    },
    /// A reply arrived for a session that is no longer active.
    ResponseDiscarded(SessionId),
}

#[derive(Default)]
pub struct EventHub {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<EngineEvent>>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<EngineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Deliver to every live subscriber; returns how many received it.
    pub fn publish(&self, event: EngineEvent) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        subscribers.len()
    }
}
