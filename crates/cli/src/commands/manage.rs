// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::{Error, Result};

use super::Context;

/// Print the lifecycle state of one action.
pub async fn status(ctx: &Context, id: &str) -> Result<()> {
    let id = ctx.resolve_id(id).await?;
    let state = ctx.queue.action_state(id).await?;
    println!("{} {}", id, state);
    Ok(())
}

/// Requeue a failed action at the tail.
pub async fn retry(ctx: &Context, id: &str) -> Result<()> {
    let id = ctx.resolve_id(id).await?;
    if !ctx.queue.retry_failed(id).await? {
        return Err(Error::ActionNotFound(id.to_string()));
    }
    println!("Requeued {}", id);
    Ok(())
}

/// Cancel a pending action.
pub async fn remove(ctx: &Context, id: &str) -> Result<()> {
    let id = ctx.resolve_id(id).await?;
    if !ctx.queue.remove(id).await? {
        return Err(Error::ActionNotFound(id.to_string()));
    }
    println!("Removed {}", id);
    Ok(())
}

pub async fn clear_failed(ctx: &Context) -> Result<()> {
    let cleared = ctx.queue.clear_failed().await?;
    println!("Cleared {} failed action(s)", cleared);
    Ok(())
}

#[cfg(test)]
#[path = "manage_tests.rs"]
mod tests;
