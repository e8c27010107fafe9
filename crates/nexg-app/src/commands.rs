//! Parsing of interactive input lines.

use std::path::PathBuf;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text for the model.
    Say(String),
    /// Blank line.
    Empty,
    New,
    List,
    Switch(SessionRef),
    /// Delete the given session, or the active one.
    Delete(Option<SessionRef>),
    Stop,
    Image(PathBuf),
    Audio(PathBuf),
    Youtube {
        url: String,
        language: Option<String>,
    },
    Document(String),
    Pdf {
        path: PathBuf,
        language: Option<String>,
    },
    /// Translate the active grounding; `None` uses the configured language.
    Translate(Option<String>),
    Analyze,
    Ungrounded,
    Export(PathBuf),
    Languages,
    Help,
    Quit,
}

/// How a session is named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRef {
    /// 1-based position in `/list` output.
    Index(usize),
    /// Full id or unique id prefix.
    Id(String),
}

impl SessionRef {
    fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(n) if n > 0 => SessionRef::Index(n),
            _ => SessionRef::Id(arg.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
Type a message and press Enter to chat.

  /new                       start a new session
  /list                      list sessions (newest first)
  /switch <n|id>             switch to a session
  /delete [n|id]             delete a session (default: the active one)
  /stop                      finish the current reply at once (also Ctrl-C)
  /image <path>              attach an image
  /audio <path>              attach an audio file
  /youtube <url> [lang]      load a video transcript into this session
  /document <text>           use pasted text as this session's content
  /pdf <path> [lang]         extract a PDF into this session's content
  /translate [language]      translate the loaded content
  /analyze                   analyze the loaded content
  /ungrounded                stop answering from the loaded content
  /export <path>             save this session as plain text
  /languages                 list supported languages
  /help                      show this help
  /quit                      exit";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let mut words = arg.split_whitespace();

    let command = match name.to_ascii_lowercase().as_str() {
        "new" => Command::New,
        "list" | "ls" => Command::List,
        "switch" => Command::Switch(
            words
                .next()
                .map(SessionRef::parse)
                .ok_or(CommandError::Usage("/switch <n|id>"))?,
        ),
        "delete" | "rm" => Command::Delete(words.next().map(SessionRef::parse)),
        "stop" => Command::Stop,
        "image" => Command::Image(required_path(arg, "/image <path>")?),
        "audio" => Command::Audio(required_path(arg, "/audio <path>")?),
        "youtube" | "yt" => {
            let url = words
                .next()
                .ok_or(CommandError::Usage("/youtube <url> [lang]"))?;
            Command::Youtube {
                url: url.to_string(),
                language: words.next().map(String::from),
            }
        }
        "document" | "doc" => {
            if arg.is_empty() {
                return Err(CommandError::Usage("/document <text>"));
            }
            Command::Document(arg.to_string())
        }
        "pdf" => {
            let path = words
                .next()
                .ok_or(CommandError::Usage("/pdf <path> [lang]"))?;
            Command::Pdf {
                path: PathBuf::from(path),
                language: words.next().map(String::from),
            }
        }
        "translate" => Command::Translate((!arg.is_empty()).then(|| arg.to_string())),
        "analyze" => Command::Analyze,
        "ungrounded" => Command::Ungrounded,
        "export" => Command::Export(required_path(arg, "/export <path>")?),
        "languages" => Command::Languages,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn required_path(arg: &str, usage: &'static str) -> Result<PathBuf, CommandError> {
    if arg.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(PathBuf::from(arg))
    }
}
