//! Command-line front end for the task tracker.
//!
//! Plays the session role for the core: it remembers who is logged in, checks
//! input before it reaches a task list and persists into a [`FileStorage`].
pub mod cli;
pub mod commands;
pub mod config;
pub mod session;

use anyhow::Context;
use cli::Cli;
use config::Config;
use task_tracker_core::FileStorage;

/// Installs the stderr log subscriber at the configured level.
pub fn init_logging(config: &Config) {
    // Tests may install a subscriber before us.
    let _ = tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs a parsed command line, printing results to stdout.
pub fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let path = cli.storage.unwrap_or_else(|| config.storage_path.clone());
    tracing::debug!("Using storage file {}", path.display());
    let storage = FileStorage::new(path);
    let mut stdout = std::io::stdout().lock();
    commands::execute(cli.command, cli.user.as_deref(), storage, &mut stdout)
        .context("Command failed")
}
