//! Interactive loop: reads lines, dispatches commands to the engine and
//! the content collaborators.

use std::path::Path;
use std::sync::Arc;

use nexg_ai::{
    export, language, prompts, AiClient, AiError, CommandDocumentExtractor, DocumentExtractor,
    Engine, EngineError, HttpDocumentExtractor, MessageKind, SessionSummary, SubmitOutcome,
    TranscriptClient,
};
use nexg_common::SessionId;
use nexg_config::NexgConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::commands::{self, Command, SessionRef, HELP};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error(transparent)]
    Command(#[from] commands::CommandError),
    #[error("{path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
    #[error("no session matches '{0}'")]
    NoSuchSession(String),
    #[error("'{0}' matches more than one session")]
    AmbiguousSession(String),
    #[error("no content loaded in this session (use /youtube, /document or /pdf)")]
    NoContent,
}

fn file_error(path: &Path) -> impl FnOnce(std::io::Error) -> AppError + '_ {
    move |source| AppError::File {
        path: path.display().to_string(),
        source,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    engine: Arc<Engine>,
    client: Arc<dyn AiClient>,
    transcripts: TranscriptClient,
    documents: Box<dyn DocumentExtractor>,
    config: NexgConfig,
}

impl App {
    pub fn new(
        engine: Arc<Engine>,
        client: Arc<dyn AiClient>,
        config: NexgConfig,
    ) -> Result<Self, AiError> {
        let transcripts = TranscriptClient::new(config.services.transcript_url.clone())?;
        let documents: Box<dyn DocumentExtractor> = match &config.services.document_url {
            Some(url) => Box::new(HttpDocumentExtractor::new(url.clone())?),
            None => Box::new(CommandDocumentExtractor::new(
                &config.services.document_command,
            )?),
        };
        Ok(Self {
            engine,
            client,
            transcripts,
            documents,
            config,
        })
    }

    /// Read commands from stdin until `/quit`, end of input, or `shutdown`.
    pub async fn run(&self, shutdown: CancellationToken) {
        println!("Type /help for commands.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                _ = shutdown.cancelled() => break,
            };
            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read input: {e}");
                    break;
                }
            };

            let flow = match commands::parse(&line) {
                Ok(command) => self.dispatch(command).await,
                Err(e) => Err(e.into()),
            };
            match flow {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => eprintln!("error: {e}"),
            }
        }
        self.engine.stop();
    }

    async fn dispatch(&self, command: Command) -> Result<Flow, AppError> {
        debug!(?command, "dispatch");
        match command {
            Command::Empty => {}
            Command::Say(text) => self.submit(text),
            Command::New => {
                let id = self.engine.create_session();
                println!("Started session {}", id.short());
            }
            Command::List => print_sessions(&self.engine.sessions()),
            Command::Switch(target) => {
                let id = resolve_session(&self.engine.sessions(), &target)?;
                self.engine.switch_session(&id)?;
                println!("Switched to session {}", id.short());
                self.print_history();
            }
            Command::Delete(target) => {
                let id = match target {
                    Some(target) => resolve_session(&self.engine.sessions(), &target)?,
                    None => self.engine.active_id(),
                };
                self.engine.delete_session(&id)?;
                println!(
                    "Deleted session {}; active is {}",
                    id.short(),
                    self.engine.active_id().short()
                );
            }
            Command::Stop => self.engine.stop(),
            Command::Image(path) => self.attach(MessageKind::Image, &path).await?,
            Command::Audio(path) => self.attach(MessageKind::Audio, &path).await?,
            Command::Youtube { url, language } => {
                let language = language.unwrap_or_else(|| self.default_language());
                println!("Fetching transcript...");
                let transcript = self.transcripts.fetch(&url, &language).await?;
                self.ground(transcript)?;
            }
            Command::Document(text) => self.ground(text)?,
            Command::Pdf { path, language } => {
                let language = language.unwrap_or_else(|| self.default_language());
                let bytes = tokio::fs::read(&path).await.map_err(file_error(&path))?;
                let name = file_name(&path);
                println!("Extracting {name}...");
                let text = self.documents.extract(bytes, &name, &language).await?;
                self.ground(text)?;
            }
            Command::Translate(target) => {
                let content = self.engine.grounding().ok_or(AppError::NoContent)?;
                let target = target.unwrap_or_else(|| self.config.services.translate_to.clone());
                let target = translation_target(&target);
                println!("Translating to {target}...");
                let translated =
                    prompts::translate(self.client.as_ref(), &content, &target).await?;
                println!("{translated}");
            }
            Command::Analyze => {
                let content = self.engine.grounding().ok_or(AppError::NoContent)?;
                println!("Analyzing...");
                let analysis = prompts::analyze(self.client.as_ref(), &content).await?;
                println!("{analysis}");
            }
            Command::Ungrounded => {
                self.engine.clear_grounding();
                println!("Content detached; answers are no longer tied to it.");
            }
            Command::Export(path) => {
                let messages = self.engine.current_view();
                export::save_history(&path, &messages)
                    .await
                    .map_err(file_error(&path))?;
                println!("Saved {} messages to {}", messages.len(), path.display());
            }
            Command::Languages => {
                for (name, code) in language::LANGUAGES {
                    println!("  {code}  {name}");
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Submit in the background so `/stop` and `/switch` stay usable while
    /// the reply is revealed.
    fn submit(&self, text: String) {
        let engine = self.engine.clone();
        tokio::spawn(async move {
            match engine.submit(&text).await {
                Ok(SubmitOutcome::Delivered { .. }) => {}
                Ok(SubmitOutcome::Discarded) => info!("Reply arrived after leaving its session"),
                // The renderer already shows the apology.
                Err(EngineError::RequestFailed(_)) => {}
                Err(e) => eprintln!("error: {e}"),
            }
        });
    }

    async fn attach(&self, kind: MessageKind, path: &Path) -> Result<(), AppError> {
        let absolute = tokio::fs::canonicalize(path)
            .await
            .map_err(file_error(path))?;
        let name = file_name(path);
        self.engine
            .attach(kind, name.clone(), format!("file://{}", absolute.display()))?;
        println!("Attached {name}");
        Ok(())
    }

    fn default_language(&self) -> String {
        self.config.services.default_language.clone()
    }

    fn ground(&self, text: String) -> Result<(), AppError> {
        let words = text.split_whitespace().count();
        self.engine.set_grounding(text)?;
        println!("Loaded {words} words. Ask questions about it, or use /translate and /analyze.");
        Ok(())
    }

    fn print_history(&self) {
        for message in self.engine.current_view() {
            let speaker = match message.role {
                nexg_ai::Role::User => "You",
                nexg_ai::Role::Assistant => "AI Assistant",
            };
            println!("{speaker}: {}", message.content);
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_sessions(sessions: &[SessionSummary]) {
    for (i, s) in sessions.iter().enumerate() {
        let marker = if s.active { '*' } else { ' ' };
        let grounded = if s.grounded { ", with content" } else { "" };
        println!(
            "{marker} {:>2}. {}  {}  ({} messages{grounded})  {}",
            i + 1,
            s.id.short(),
            s.title,
            s.message_count,
            s.created_at.with_timezone(&chrono::Local).format("%H:%M:%S"),
        );
    }
}

/// Map a `/list` position or id prefix to a session id.
fn resolve_session(
    sessions: &[SessionSummary],
    target: &SessionRef,
) -> Result<SessionId, AppError> {
    match target {
        SessionRef::Index(n) => sessions
            .get(n - 1)
            .map(|s| s.id.clone())
            .ok_or_else(|| AppError::NoSuchSession(n.to_string())),
        SessionRef::Id(prefix) => {
            let mut matches = sessions
                .iter()
                .filter(|s| s.id.as_str().starts_with(prefix.as_str()));
            match (matches.next(), matches.next()) {
                (Some(s), None) => Ok(s.id.clone()),
                (None, _) => Err(AppError::NoSuchSession(prefix.clone())),
                (Some(_), Some(_)) => Err(AppError::AmbiguousSession(prefix.clone())),
            }
        }
    }
}

/// Accept a language code or name and return the display name used in the
/// translation prompt. Unknown names pass through unchanged.
fn translation_target(input: &str) -> String {
    let input = input.trim();
    if let Some(name) = language::name_for(input) {
        return name.to_string();
    }
    language::code_for(input)
        .and_then(language::name_for)
        .unwrap_or(input)
        .to_string()
}
