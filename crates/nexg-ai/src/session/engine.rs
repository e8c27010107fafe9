//! Engine struct and its synchronous session operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nexg_common::SessionId;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::reveal::Revealer;
use crate::{AiClient, Message, MessageKind};

use super::events::{EngineEvent, EventHub};
use super::store::SessionStore;
use super::types::{EngineError, SessionSummary};

/// Owns every session and serializes model requests and reveals.
///
/// All state sits behind short-held locks, so the engine can be shared as
/// `Arc<Engine>` between the input loop and a Ctrl-C watcher.
pub struct Engine {
    pub(super) client: Arc<dyn AiClient>,
    pub(super) revealer: Revealer,
    pub(super) store: Mutex<SessionStore>,
    /// Stop handle of the reveal in progress, if any.
    pub(super) reveal_stop: Mutex<Option<CancellationToken>>,
    /// Set while a request or reveal is in flight.
    pub(super) busy: AtomicBool,
    pub(super) events: EventHub,
}

impl Engine {
    /// An engine with one empty, active session.
    pub fn new(client: Arc<dyn AiClient>, revealer: Revealer) -> Self {
        Self {
            client,
            revealer,
            store: Mutex::new(SessionStore::new()),
            reveal_stop: Mutex::new(None),
            busy: AtomicBool::new(false),
            events: EventHub::new(),
        }
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<EngineEvent> {
        self.events.subscribe()
    }

    pub(super) fn lock_store(&self) -> MutexGuard<'_, SessionStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn lock_reveal(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.reveal_stop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Create an empty session and make it active.
    pub fn create_session(&self) -> SessionId {
        let id = self.lock_store().create();
        self.stop();
        info!(session = %id.short(), "session created");
        self.events.publish(EngineEvent::SessionCreated(id.clone()));
        self.events.publish(EngineEvent::ActiveChanged(id.clone()));
        id
    }

    /// Remove a session. Deleting the active one activates the most recently
    /// created remaining session, or a fresh one when none remain.
    pub fn delete_session(&self, id: &SessionId) -> Result<(), EngineError> {
        let (activated, created) = {
            let mut store = self.lock_store();
            let before = store.len();
            let activated = store.delete(id)?;
            // Store size is unchanged only when a replacement was created.
            let created = activated.is_some() && store.len() == before;
            (activated, created)
        };
        info!(session = %id.short(), "session deleted");
        self.events.publish(EngineEvent::SessionDeleted(id.clone()));

        if let Some(active) = activated {
            self.stop();
            if created {
                self.events
                    .publish(EngineEvent::SessionCreated(active.clone()));
            }
            self.events.publish(EngineEvent::ActiveChanged(active));
        }
        Ok(())
    }

    /// Make `id` the active session.
    pub fn switch_session(&self, id: &SessionId) -> Result<(), EngineError> {
        let changed = {
            let mut store = self.lock_store();
            let changed = store.active_id() != id;
            store.switch(id)?;
            changed
        };
        if changed {
            self.stop();
            debug!(session = %id.short(), "active session changed");
            self.events.publish(EngineEvent::ActiveChanged(id.clone()));
        }
        Ok(())
    }

    /// Append an image or audio message to the active session. No model
    /// request is made.
    pub fn attach(
        &self,
        kind: MessageKind,
        name: impl Into<String>,
        media_reference: impl Into<String>,
    ) -> Result<(), EngineError> {
        if self.is_busy() {
            return Err(EngineError::Busy);
        }
        let message = Message::media(kind, name, media_reference);
        let session = {
            let mut store = self.lock_store();
            let id = store.active_id().clone();
            store.get_mut(&id)?.messages.push(message.clone());
            id
        };
        self.events
            .publish(EngineEvent::MessageAppended { session, message });
        Ok(())
    }

    /// Ground the active session on `text`. Its previous messages are cleared.
    pub fn set_grounding(&self, text: impl Into<String>) -> Result<(), EngineError> {
        if self.is_busy() {
            return Err(EngineError::Busy);
        }
        let text = text.into();
        let mut store = self.lock_store();
        let id = store.active_id().clone();
        let session = store.get_mut(&id)?;
        info!(session = %id.short(), chars = text.len(), "grounding attached");
        session.messages.clear();
        session.grounding = Some(text);
        Ok(())
    }

    /// Drop the active session's grounding. Messages are kept.
    pub fn clear_grounding(&self) {
        let mut store = self.lock_store();
        let id = store.active_id().clone();
        if let Ok(session) = store.get_mut(&id) {
            session.grounding = None;
        }
    }

    /// Cancel the reveal in progress. No-op when nothing is revealing.
    pub fn stop(&self) {
        if let Some(token) = self.lock_reveal().as_ref() {
            token.cancel();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn active_id(&self) -> SessionId {
        self.lock_store().active_id().clone()
    }

    /// Session summaries, newest first.
    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.lock_store().summaries()
    }

    pub fn messages(&self, id: &SessionId) -> Result<Vec<Message>, EngineError> {
        Ok(self.lock_store().get(id)?.messages.clone())
    }

    /// Messages of the active session.
    pub fn current_view(&self) -> Vec<Message> {
        self.lock_store()
            .active()
            .map(|s| s.messages.clone())
            .unwrap_or_default()
    }

    /// Grounding text of the active session.
    pub fn grounding(&self) -> Option<String> {
        self.lock_store()
            .active()
            .ok()
            .and_then(|s| s.grounding.clone())
    }
}
