// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::Utc;
use hs_core::{ActionKind, ConnectivityState, QueuedAction};
use tokio::sync::watch;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{ConnectivitySource, Dispatch, ProbeSource, SyncOrchestrator};

use super::{parse_payload, Context};

pub async fn run(
    ctx: &Context,
    kind: &str,
    payload: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    let kind: ActionKind = kind.parse()?;
    let payload = parse_payload(payload)?;
    let action = ctx.queue.enqueue(kind, payload).await?;
    let pending = ctx.queue.len().await?;

    match output {
        OutputFormat::Text => println!("{}", format_queued(&action, pending)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&action)?),
    }
    Ok(())
}

/// Send now when the API answers a probe and nothing is queued ahead;
/// otherwise queue.
pub async fn send(ctx: &Context, kind: &str, payload: Option<&str>) -> Result<()> {
    let kind: ActionKind = kind.parse()?;
    let payload = parse_payload(payload)?;
    let state = probe_once(ctx).await?;
    dispatch(ctx, state, kind, payload).await
}

pub(crate) async fn dispatch(
    ctx: &Context,
    state: ConnectivityState,
    kind: ActionKind,
    payload: serde_json::Value,
) -> Result<()> {
    let (_state_tx, state_rx) = watch::channel(state);
    let orchestrator = SyncOrchestrator::new(ctx.queue.clone(), state_rx).await?;

    let outcome = orchestrator.dispatch(kind, payload).await;
    orchestrator.shutdown();
    match outcome? {
        Dispatch::Sent => println!("Sent {}", kind),
        Dispatch::Queued(action) => {
            let pending = ctx.queue.len().await?;
            println!("{}", format_queued(&action, pending));
        }
    }
    Ok(())
}

async fn probe_once(ctx: &Context) -> Result<ConnectivityState> {
    let mut probe = ProbeSource::new(
        ctx.config.probe_addr()?,
        ctx.config.probe_interval(),
        ctx.config.probe_timeout(),
    );
    let state = match probe.next_event().await {
        Some(event) => ConnectivityState::default().apply(&event, Utc::now()),
        None => ConnectivityState::default(),
    };
    tracing::debug!(addr = %probe.addr(), online = state.is_online, "probed API");
    Ok(state)
}

pub(crate) fn format_queued(action: &QueuedAction, pending: usize) -> String {
    format!(
        "Queued {} {} ({} pending)",
        action.kind, action.id, pending
    )
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
