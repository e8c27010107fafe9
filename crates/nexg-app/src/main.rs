mod cli;
mod commands;
mod render;
mod repl;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use nexg_ai::{AiClient, Engine, GeminiClient, GeminiConfig, Revealer};
use nexg_config::{credentials, NexgConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// `KEY=VALUE` pairs from .env text. Blank lines and `#` comments are
/// skipped; surrounding quotes are stripped from values.
fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            (
                key.trim(),
                value.trim().trim_matches('"').trim_matches('\''),
            )
        })
        .collect()
}

/// Load environment variables from ./.env. Variables already set win.
///
/// Must run before the tokio runtime starts any threads.
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for (key, value) in parse_dotenv(&contents) {
        if std::env::var(key).is_err() {
            std::env::set_var(key, value);
        }
    }
}

fn init_logging(directive: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();
}

/// Stop the reveal on Ctrl-C; when nothing is revealing, shut down.
fn spawn_interrupt_watcher(engine: Arc<Engine>, shutdown: CancellationToken) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if engine.is_busy() {
                engine.stop();
            } else {
                shutdown.cancel();
                break;
            }
        }
    });
}

fn main() -> ExitCode {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();

    let loaded = match &args.config {
        Some(path) => nexg_config::load_config_from(path),
        None => nexg_config::load_config(),
    };
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.directive());
    init_logging(&log_directive);

    tracing::info!("NexG v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(args.no_welcome, config));
    // A pending stdin read sits on a blocking thread; don't wait for it.
    runtime.shutdown_background();

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(no_welcome: bool, config: NexgConfig) -> nexg_common::Result<()> {
    let api_key = credentials::api_key_from_env()?;
    let gemini = GeminiClient::new(GeminiConfig::from_config(api_key, &config))
        .map_err(|e| nexg_common::NexgError::Ai(e.to_string()))?;
    tracing::info!("Model: {}", gemini.model());

    if let Err(e) = gemini.verify().await {
        tracing::warn!("Model check failed: {e}");
        eprintln!("warning: could not reach {}: {e}", gemini.model());
    }

    let client: Arc<dyn AiClient> = Arc::new(gemini);
    let revealer = Revealer::new(Duration::from_millis(config.reveal.interval_ms));
    let engine = Arc::new(Engine::new(client.clone(), revealer));

    tokio::spawn(render::run(engine.subscribe(), engine.active_id()));

    let shutdown = CancellationToken::new();
    spawn_interrupt_watcher(engine.clone(), shutdown.clone());

    if !no_welcome {
        if let Err(e) = engine.reveal_only(&config.reveal.welcome_message).await {
            tracing::debug!("Welcome skipped: {e}");
        }
    }

    let app = repl::App::new(engine, client, config)
        .map_err(|e| nexg_common::NexgError::Ai(e.to_string()))?;
    app.run(shutdown).await;
    Ok(())
}
