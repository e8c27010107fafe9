//! In-memory session storage with an active-session pointer.

use std::collections::HashMap;

use nexg_common::SessionId;

use crate::Message;

use super::types::{ConversationSession, EngineError, SessionSummary};

/// All sessions of one process. There is always exactly one active session.
pub(crate) struct SessionStore {
    sessions: HashMap<SessionId, ConversationSession>,
    active: SessionId,
    next_seq: u64,
}

impl SessionStore {
    /// A store holding a single empty, active session.
    pub(crate) fn new() -> Self {
        let first = ConversationSession::new(0);
        let active = first.id.clone();
        Self {
            sessions: HashMap::from([(active.clone(), first)]),
            active,
            next_seq: 1,
        }
    }

    pub(crate) fn create(&mut self) -> SessionId {
        let session = ConversationSession::new(self.next_seq);
        self.next_seq += 1;
        let id = session.id.clone();
        self.sessions.insert(id.clone(), session);
        self.active = id.clone();
        id
    }

    /// Remove a session. Returns the new active id when the active one was
    /// removed.
    pub(crate) fn delete(&mut self, id: &SessionId) -> Result<Option<SessionId>, EngineError> {
        if self.sessions.remove(id).is_none() {
            return Err(EngineError::NotFound(id.clone()));
        }
        if *id != self.active {
            return Ok(None);
        }

        let next = self
            .sessions
            .values()
            .max_by_key(|s| s.seq)
            .map(|s| s.id.clone());
        let next = match next {
            Some(next) => {
                self.active = next.clone();
                next
            }
            None => self.create(),
        };
        Ok(Some(next))
    }

    pub(crate) fn switch(&mut self, id: &SessionId) -> Result<(), EngineError> {
        if !self.sessions.contains_key(id) {
            return Err(EngineError::NotFound(id.clone()));
        }
        self.active = id.clone();
        Ok(())
    }

    pub(crate) fn active_id(&self) -> &SessionId {
        &self.active
    }

    pub(crate) fn is_active(&self, id: &SessionId) -> bool {
        self.active == *id && self.sessions.contains_key(id)
    }

    pub(crate) fn get(&self, id: &SessionId) -> Result<&ConversationSession, EngineError> {
        self.sessions
            .get(id)
            .ok_or_else(|| EngineError::NotFound(id.clone()))
    }

    pub(crate) fn get_mut(
        &mut self,
        id: &SessionId,
    ) -> Result<&mut ConversationSession, EngineError> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| EngineError::NotFound(id.clone()))
    }

    pub(crate) fn active(&self) -> Result<&ConversationSession, EngineError> {
        self.get(&self.active)
    }

    /// Append to `id` only while it is still the active session.
    pub(crate) fn append_if_active(&mut self, id: &SessionId, message: Message) -> bool {
        if self.active != *id {
            return false;
        }
        match self.sessions.get_mut(id) {
            Some(session) => {
                session.messages.push(message);
                true
            }
            None => false,
        }
    }

    /// Summaries ordered newest first.
    pub(crate) fn summaries(&self) -> Vec<SessionSummary> {
        let mut sessions: Vec<_> = self.sessions.values().collect();
        sessions.sort_by(|a, b| b.seq.cmp(&a.seq));
        sessions
            .into_iter()
            .map(|s| s.summary(s.id == self.active))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.len()
    }
}
