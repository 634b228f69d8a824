// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use hs_core::{FailedAction, QueuedAction};

use crate::cli::OutputFormat;
use crate::error::Result;

use super::Context;

/// Print pending actions in replay order.
pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let queue = ctx.queue.get_queue().await?;
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&queue)?),
        OutputFormat::Text => {
            if queue.is_empty() {
                println!("No pending actions");
            }
            for (position, action) in queue.iter().enumerate() {
                println!("{}", format_action_line(position + 1, action));
            }
        }
    }
    Ok(())
}

/// Print the dead-letter list.
pub async fn failed(ctx: &Context, output: OutputFormat) -> Result<()> {
    let failed = ctx.queue.failed().await?;
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&failed)?),
        OutputFormat::Text => {
            if failed.is_empty() {
                println!("No failed actions");
            }
            for entry in &failed {
                println!("{}", format_failed_line(entry));
            }
        }
    }
    Ok(())
}

pub(crate) fn format_action_line(position: usize, action: &QueuedAction) -> String {
    let mut line = format!(
        "{:>3}. {} {:<22} queued {}",
        position,
        action.id,
        action.kind.as_str(),
        action.enqueued_at.format("%Y-%m-%d %H:%M:%S")
    );
    if action.attempts > 0 {
        line.push_str(&format!(", {} failed attempt(s)", action.attempts));
    }
    if let Some(error) = &action.last_error {
        line.push_str(&format!("\n     last error: {}", error));
    }
    line
}

pub(crate) fn format_failed_line(entry: &FailedAction) -> String {
    format!(
        "{} {:<22} failed {}: {}",
        entry.action.id,
        entry.action.kind.as_str(),
        entry.failed_at.format("%Y-%m-%d %H:%M:%S"),
        entry.error
    )
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
