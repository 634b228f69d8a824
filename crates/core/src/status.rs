// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync status shown to the UI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Display state of the sync orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Nothing running. Initial state.
    #[default]
    Idle,
    /// A drain is in progress.
    Syncing,
    /// The last drain failed; pending actions remain queued.
    Error,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Error => "error",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(SyncStatus::Idle),
            "syncing" => Ok(SyncStatus::Syncing),
            "error" => Ok(SyncStatus::Error),
            _ => Err(Error::InvalidSyncStatus(s.to_string())),
        }
    }
}

/// Read-only projection consumed by an offline banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncView {
    pub is_online: bool,
    pub is_offline: bool,
    pub sync_status: SyncStatus,
    pub pending_actions: usize,
}

impl SyncView {
    pub fn new(is_online: bool, sync_status: SyncStatus, pending_actions: usize) -> Self {
        SyncView {
            is_online,
            is_offline: !is_online,
            sync_status,
            pending_actions,
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
