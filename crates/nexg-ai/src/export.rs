//! Plain-text export of a conversation.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::info;

use crate::{Message, MessageKind, Role};

pub const EXPORT_TITLE: &str = "AI Chat - Conversation History";
const EMPTY_HISTORY: &str = "No chat history available.";

/// Render `messages` as a readable history stamped with `generated_at`.
pub fn render_history(messages: &[Message], generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{EXPORT_TITLE}\n");
    let _ = writeln!(
        out,
        "Generated on: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );

    if messages.is_empty() {
        let _ = writeln!(out, "{EMPTY_HISTORY}");
        return out;
    }

    let _ = writeln!(out, "Chat History\n");
    for message in messages {
        let speaker = match message.role {
            Role::User => "You",
            Role::Assistant => "AI Assistant",
        };
        let body = match message.kind {
            MessageKind::Text => message.content.clone(),
            MessageKind::Image => format!("[image: {}]", message.content),
            MessageKind::Audio => format!("[audio: {}]", message.content),
        };
        let _ = writeln!(out, "{speaker}:\n{body}\n");
    }
    out
}

/// Write the rendered history to `path`, replacing any existing file.
pub async fn save_history(path: &Path, messages: &[Message]) -> std::io::Result<()> {
    let text = render_history(messages, Local::now());
    tokio::fs::write(path, text).await?;
    info!(path = %path.display(), messages = messages.len(), "conversation exported");
    Ok(())
}
