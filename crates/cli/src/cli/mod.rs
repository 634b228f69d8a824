// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "homestead")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline action queue and sync for the Homestead listings client")]
#[command(
    long_about = "Offline action queue and sync for the Homestead listings client.\n\n\
    Actions recorded while offline are stored durably and replayed in order once the API is reachable."
)]
pub struct Cli {
    /// Path to config.toml (default: <config dir>/homestead/config.toml)
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record an action for later replay
    #[command(after_help = "\
Examples:
  homestead enqueue save-listing -p '{\"listingId\": 42}'
  homestead enqueue update-profile -p '{\"name\": \"Ada\"}' -o json")]
    Enqueue {
        /// Action kind (update-profile, create-listing-inquiry, save-listing, unsave-listing)
        #[arg(value_parser = non_empty_string)]
        kind: String,

        /// JSON payload sent as the request body (default: {})
        #[arg(long, short)]
        payload: Option<String>,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Send an action now if the API is reachable, otherwise queue it
    Send {
        /// Action kind (update-profile, create-listing-inquiry, save-listing, unsave-listing)
        #[arg(value_parser = non_empty_string)]
        kind: String,

        /// JSON payload sent as the request body (default: {})
        #[arg(long, short)]
        payload: Option<String>,
    },

    /// List pending actions in replay order
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List actions that were given up on
    Failed {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show where an action is in its lifecycle
    Status {
        /// Action id or unique prefix
        id: String,
    },

    /// Move a failed action back to the end of the queue
    Retry {
        /// Action id or unique prefix
        id: String,
    },

    /// Cancel a pending action
    Remove {
        /// Action id or unique prefix
        id: String,
    },

    /// Delete every failed action
    ClearFailed,

    /// Replay the queue once
    Sync,

    /// Monitor connectivity and sync whenever the API becomes reachable
    Watch,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
