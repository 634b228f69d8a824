// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use hs_core::SyncView;

use crate::error::Result;
use crate::sync::{NetworkMonitor, ProbeSource, SyncOrchestrator};

use super::Context;

/// Probe the API and sync on every reconnect until Ctrl-C.
pub async fn run(ctx: &Context) -> Result<()> {
    let addr = ctx.config.probe_addr()?;
    tracing::info!(%addr, "watching connectivity");
    let source = ProbeSource::new(addr, ctx.config.probe_interval(), ctx.config.probe_timeout());
    let monitor = NetworkMonitor::spawn(source, ctx.config.monitor_config());
    let (orchestrator, handle) = SyncOrchestrator::attach(ctx.queue.clone(), &monitor).await?;

    let mut views = orchestrator.watch_view();
    println!("{}", format_view(&views.borrow_and_update()));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = *views.borrow_and_update();
                println!("{}", format_view(&view));
            }
        }
    }

    orchestrator.shutdown();
    monitor.join().await;
    let _ = handle.await;
    Ok(())
}

pub(crate) fn format_view(view: &SyncView) -> String {
    format!(
        "{:<7} sync={:<7} pending={}",
        if view.is_online { "online" } else { "offline" },
        view.sync_status.as_str(),
        view.pending_actions
    )
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
