use std::path::PathBuf;

use clap::Parser;

/// NexG: a terminal chat client for Gemini with multiple sessions.
#[derive(Parser, Debug)]
#[command(name = "nexg", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. `nexg=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Skip the start-up greeting.
    #[arg(long)]
    pub no_welcome: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
