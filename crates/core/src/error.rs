// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for hs-core parsing and validation.

use thiserror::Error;

/// All possible errors that can occur in hs-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid action kind: '{0}'\n  hint: valid kinds are: update-profile, create-listing-inquiry, save-listing, unsave-listing")]
    InvalidActionKind(String),

    #[error("invalid action id: '{0}'")]
    InvalidActionId(String),

    #[error("invalid sync status: '{0}'\n  hint: valid statuses are: idle, syncing, error")]
    InvalidSyncStatus(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for hs-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
