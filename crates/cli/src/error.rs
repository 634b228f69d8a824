// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::store::StoreError;
use crate::sync::{DispatchError, DrainError};

/// All possible errors that can occur in the hsync library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("action not found: {0}\n  hint: run 'homestead list' or 'homestead failed' to see action ids")]
    ActionNotFound(String),

    #[error("ambiguous action id '{prefix}' matches: {}", matches.join(", "))]
    AmbiguousId {
        prefix: String,
        matches: Vec<String>,
    },

    #[error("invalid action kind: '{0}'\n  hint: valid kinds are: update-profile, create-listing-inquiry, save-listing, unsave-listing")]
    InvalidActionKind(String),

    #[error("invalid action id: '{0}'")]
    InvalidActionId(String),

    #[error("invalid sync status: '{0}'\n  hint: valid statuses are: idle, syncing, error")]
    InvalidSyncStatus(String),

    #[error("invalid payload: {0}\n  hint: payload must be a JSON value, e.g. '{{\"listingId\": 42}}'")]
    InvalidPayload(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Drain(#[from] DrainError),

    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for hsync operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<hs_core::Error> for Error {
    fn from(e: hs_core::Error) -> Self {
        match e {
            hs_core::Error::InvalidActionKind(s) => Error::InvalidActionKind(s),
            hs_core::Error::InvalidActionId(s) => Error::InvalidActionId(s),
            hs_core::Error::InvalidSyncStatus(s) => Error::InvalidSyncStatus(s),
            hs_core::Error::Json(e) => Error::Json(e),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
