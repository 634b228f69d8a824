// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;
use crate::sync::DrainReport;

use super::Context;

/// Replay the queue once. A halted or aborted drain is an error.
pub async fn run(ctx: &Context) -> Result<()> {
    let report = ctx.queue.process_queue().await?;
    println!("{}", format_report(&report));
    Ok(())
}

pub(crate) fn format_report(report: &DrainReport) -> String {
    if report.replayed == 0 && report.discarded == 0 && report.remaining == 0 {
        return "Nothing to sync".to_string();
    }
    let mut line = format!("Replayed {}", report.replayed);
    if report.discarded > 0 {
        line.push_str(&format!(", discarded {}", report.discarded));
    }
    line.push_str(&format!(", {} pending", report.remaining));
    line
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
