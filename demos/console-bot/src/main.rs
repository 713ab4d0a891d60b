//! Console Bot Example
//!
//! Runs the Archivist command catalog against an in-memory orchestrator,
//! reading interactions from stdin and printing replies to stdout.
//!
//! # Usage
//!
//! ```bash
//! echo '{"command":"archive","options":{"url":"https://example.com"},"guild":1,"channel":"archivebot","permissions":["manage_messages"]}' \
//!     | cargo run --package console-bot
//!
//! # Print the registration payloads only
//! cargo run --package console-bot -- --register-only --guilds 100,200
//! ```
//!
//! Logs go to stderr unless the configuration names a file.

mod console;
mod orchestrator;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use archivist::prelude::*;
use archivist::runtime::config::LogOutput;
use archivist::runtime::{ConfigLoader, LoggingBuilder, validate_config};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::console::{ConsoleEvent, ConsoleInteraction, ConsoleRegistrar};
use crate::orchestrator::MemoryOrchestrator;

#[derive(Debug, Parser)]
#[command(name = "console-bot", about = "Drive the Archivist commands from stdin")]
struct Cli {
    /// Configuration file to load instead of searching for `archivist.toml`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Configuration profile.
    #[arg(long)]
    profile: Option<String>,

    /// Register commands in these guilds instead of globally.
    #[arg(long, value_delimiter = ',')]
    guilds: Vec<u64>,

    /// Print the registration payloads and exit.
    #[arg(long)]
    register_only: bool,
}

fn load_config(cli: &Cli) -> Result<ArchivistConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.file(path);
    }
    if let Some(profile) = &cli.profile {
        loader = loader.profile(profile);
    }

    let mut config = loader.load()?;
    if !cli.guilds.is_empty() {
        config.commands.guilds = cli.guilds.iter().copied().map(GroupId).collect();
    }
    // Stdout carries replies.
    if config.logging.output == LogOutput::Stdout {
        config.logging.output = LogOutput::Stderr;
    }
    validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    LoggingBuilder::from_config(&config.logging).init();

    let runtime = ArchivistRuntime::new(config, MemoryOrchestrator::default());
    let calls = runtime.register_commands(ConsoleRegistrar).await?;
    info!(calls, "Registration finished");
    if cli.register_only {
        return Ok(());
    }

    let (tx, rx) = mpsc::channel::<BoxedInteraction>(64);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ConsoleEvent>(&line) {
                Ok(event) => {
                    let interaction: BoxedInteraction = Arc::new(ConsoleInteraction::new(event));
                    if tx.send(interaction).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "Skipping malformed interaction"),
            }
        }
    });

    let shutdown = CancellationToken::new();
    shutdown_on_ctrl_c(shutdown.clone());
    runtime.run(rx, shutdown).await;

    let stats = runtime.stats();
    info!(handled = stats.handled, failed = stats.failed, "Console bot stopped");
    Ok(())
}
