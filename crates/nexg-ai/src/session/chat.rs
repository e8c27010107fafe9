//! Async engine operations: submit, reveal, and the stale-reply guard.

use nexg_common::{new_correlation_id, SessionId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::prompts::grounding_instruction;
use crate::reveal::RevealOutcome;
use crate::Message;

use super::engine::Engine;
use super::events::EngineEvent;
use super::types::{BusyGuard, EngineError, SubmitOutcome, FALLBACK_REPLY};

impl Engine {
    /// Send `text` in the active session and reveal the reply.
    ///
    /// The user message is stored before the request goes out and is kept
    /// whatever happens next. The reply (or the fallback apology on failure)
    /// is stored only if the originating session is still active.
    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, EngineError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        let _guard = BusyGuard::acquire(&self.busy)?;
        let correlation = new_correlation_id();

        let user = Message::user(text);
        let (origin, history, system) = {
            let mut store = self.lock_store();
            let origin = store.active_id().clone();
            let session = store.get_mut(&origin)?;
            session.messages.push(user.clone());
            let system = session.grounding.as_deref().map(grounding_instruction);
            (origin, session.messages.clone(), system)
        };
        self.events.publish(EngineEvent::MessageAppended {
            session: origin.clone(),
            message: user,
        });

        debug!(
            %correlation,
            session = %origin.short(),
            messages = history.len(),
            grounded = system.is_some(),
            "sending request"
        );
        let reply = match self.client.send_message(&history, system.as_deref()).await {
            Ok(response) => response.content,
            Err(e) => {
                let detail = e.to_string();
                warn!(%correlation, session = %origin.short(), error = %detail, "request failed");
                self.append_if_active(&origin, Message::assistant(FALLBACK_REPLY));
                self.events.publish(EngineEvent::RequestFailed {
                    session: origin,
                    detail: detail.clone(),
                });
                return Err(EngineError::RequestFailed(detail));
            }
        };

        let stop = self.begin_reveal();
        if !self.is_active(&origin) {
            self.end_reveal();
            return Ok(self.discard(&origin, &correlation));
        }
        let outcome = self.reveal(Some(&origin), &reply, &stop).await;

        if self.append_if_active(&origin, Message::assistant(reply.clone())) {
            debug!(%correlation, ?outcome, chars = reply.len(), "reply stored");
            Ok(SubmitOutcome::Delivered {
                text: reply,
                reveal: outcome,
            })
        } else {
            Ok(self.discard(&origin, &correlation))
        }
    }

    /// Reveal `text` without storing it in any session.
    pub async fn reveal_only(&self, text: &str) -> Result<RevealOutcome, EngineError> {
        let _guard = BusyGuard::acquire(&self.busy)?;
        let stop = self.begin_reveal();
        Ok(self.reveal(None, text, &stop).await)
    }

    fn begin_reveal(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.lock_reveal() = Some(token.clone());
        token
    }

    fn end_reveal(&self) {
        self.lock_reveal().take();
    }

    async fn reveal(
        &self,
        session: Option<&SessionId>,
        text: &str,
        stop: &CancellationToken,
    ) -> RevealOutcome {
        let outcome = self
            .revealer
            .run(text, stop, |prefix| {
                self.events.publish(EngineEvent::Partial {
                    session: session.cloned(),
                    text: prefix.to_string(),
                });
            })
            .await;
        self.end_reveal();
        self.events.publish(EngineEvent::RevealFinished {
            session: session.cloned(),
            outcome,
        });
        outcome
    }

    fn is_active(&self, id: &SessionId) -> bool {
        self.lock_store().is_active(id)
    }

    fn append_if_active(&self, id: &SessionId, message: Message) -> bool {
        let appended = self.lock_store().append_if_active(id, message.clone());
        if appended {
            self.events.publish(EngineEvent::MessageAppended {
                session: id.clone(),
                message,
            });
        }
        appended
    }

    fn discard(&self, origin: &SessionId, correlation: &str) -> SubmitOutcome {
        info!(%correlation, session = %origin.short(), "session changed, reply discarded");
        self.events
            .publish(EngineEvent::ResponseDiscarded(origin.clone()));
        SubmitOutcome::Discarded
    }
}
