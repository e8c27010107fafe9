//! Terminal rendering of engine events.

use std::io::{self, Write};

use nexg_ai::{EngineEvent, FALLBACK_REPLY};
use nexg_common::SessionId;
use tokio::sync::mpsc::UnboundedReceiver;

pub const ASSISTANT_LABEL: &str = "AI Assistant: ";

/// Prints reveal frames as they arrive, showing only the active session.
pub struct Renderer<W: Write> {
    out: W,
    active: SessionId,
    /// Bytes of the current reply already on screen.
    shown: usize,
    revealing: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, active: SessionId) -> Self {
        Self {
            out,
            active,
            shown: 0,
            revealing: false,
        }
    }

    fn is_visible(&self, session: Option<&SessionId>) -> bool {
        session.map_or(true, |s| *s == self.active)
    }

    fn finish_line(&mut self) -> io::Result<()> {
        if self.revealing {
            writeln!(self.out)?;
            self.revealing = false;
            self.shown = 0;
        }
        Ok(())
    }

    pub fn handle(&mut self, event: &EngineEvent) -> io::Result<()> {
        match event {
            EngineEvent::ActiveChanged(id) => {
                self.finish_line()?;
                self.active = id.clone();
            }
            EngineEvent::Partial { session, text } => {
                if !self.is_visible(session.as_ref()) {
                    return Ok(());
                }
                if !self.revealing {
                    write!(self.out, "{ASSISTANT_LABEL}")?;
                    self.revealing = true;
                    self.shown = 0;
                }
                if let Some(delta) = text.get(self.shown..) {
                    write!(self.out, "{delta}")?;
                    self.shown = text.len();
                }
                self.out.flush()?;
            }
            EngineEvent::RevealFinished { session, .. } => {
                if self.is_visible(session.as_ref()) {
                    self.finish_line()?;
                }
            }
            EngineEvent::RequestFailed { session, detail } => {
                if *session == self.active {
                    self.finish_line()?;
                    writeln!(self.out, "{ASSISTANT_LABEL}{FALLBACK_REPLY}")?;
                    writeln!(self.out, "  ({detail})")?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

/// Render events to stdout until the engine is dropped.
pub async fn run(mut events: UnboundedReceiver<EngineEvent>, active: SessionId) {
    let mut renderer = Renderer::new(io::stdout(), active);
    while let Some(event) = events.recv().await {
        if let Err(e) = renderer.handle(&event) {
            tracing::warn!("Failed to write to terminal: {e}");
        }
    }
}
