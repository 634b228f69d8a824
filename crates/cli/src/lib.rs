// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! hsync - offline action queue and connectivity-driven sync.
//!
//! This crate provides the functionality behind the `homestead` CLI: user
//! actions recorded while the listings API is unreachable are persisted and
//! replayed in order once connectivity returns.
//!
//! # Main Components
//!
//! - [`store`] - Durable key-value storage and the typed [`QueueStore`](store::QueueStore)
//! - [`sync`] - [`OfflineQueue`](sync::OfflineQueue), [`NetworkMonitor`](sync::NetworkMonitor)
//!   and [`SyncOrchestrator`](sync::SyncOrchestrator)
//! - [`Config`] - TOML configuration with defaults for every key
//! - [`Error`] - Error types for all operations
//!
//! # Wiring
//!
//! ```rust,ignore
//! use hsync::sync::{NetworkMonitor, OfflineQueue, ProbeSource, SyncOrchestrator};
//!
//! let monitor = NetworkMonitor::spawn(probe, config.monitor_config());
//! let (orchestrator, _task) = SyncOrchestrator::attach(queue, &monitor).await?;
//! let mut view = orchestrator.watch_view();
//! ```

mod cli;
mod commands;

pub mod config;
pub mod error;
pub mod store;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{default_config_path, Config};
pub use error::{Error, Result};

use commands::Context;

/// Execute a parsed command line. Loads configuration, opens the queue and
/// runs the command to completion on a fresh tokio runtime.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::load(&config_path)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_command(cli.command, config))
}

async fn run_command(command: Command, config: Config) -> Result<()> {
    let ctx = Context::open(config)?;
    match command {
        Command::Enqueue {
            kind,
            payload,
            output,
        } => commands::enqueue::run(&ctx, &kind, payload.as_deref(), output).await,
        Command::Send { kind, payload } => {
            commands::enqueue::send(&ctx, &kind, payload.as_deref()).await
        }
        Command::List { output } => commands::list::run(&ctx, output).await,
        Command::Failed { output } => commands::list::failed(&ctx, output).await,
        Command::Status { id } => commands::manage::status(&ctx, &id).await,
        Command::Retry { id } => commands::manage::retry(&ctx, &id).await,
        Command::Remove { id } => commands::manage::remove(&ctx, &id).await,
        Command::ClearFailed => commands::manage::clear_failed(&ctx).await,
        Command::Sync => commands::sync::run(&ctx).await,
        Command::Watch => commands::watch::run(&ctx).await,
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
