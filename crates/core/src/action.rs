// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued user actions.
//!
//! A [`QueuedAction`] records a user-initiated remote operation that could
//! not be sent right away. Actions are replayed in the order they were
//! enqueued; ids are UUID v7 so they also sort by creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Unique identifier for a queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(Uuid);

impl ActionId {
    /// Generates a fresh, time-ordered id.
    pub fn new() -> Self {
        ActionId(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(ActionId)
            .map_err(|_| Error::InvalidActionId(s.to_string()))
    }
}

/// Which remote operation a queued action replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Update the signed-in user's profile.
    UpdateProfile,
    /// Send an inquiry about a property listing.
    CreateListingInquiry,
    /// Bookmark a listing.
    SaveListing,
    /// Remove a bookmarked listing.
    UnsaveListing,
}

impl ActionKind {
    /// All kinds, in declaration order.
    pub const ALL: [ActionKind; 4] = [
        ActionKind::UpdateProfile,
        ActionKind::CreateListingInquiry,
        ActionKind::SaveListing,
        ActionKind::UnsaveListing,
    ];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::UpdateProfile => "update-profile",
            ActionKind::CreateListingInquiry => "create-listing-inquiry",
            ActionKind::SaveListing => "save-listing",
            ActionKind::UnsaveListing => "unsave-listing",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "update-profile" => Ok(ActionKind::UpdateProfile),
            "create-listing-inquiry" => Ok(ActionKind::CreateListingInquiry),
            "save-listing" => Ok(ActionKind::SaveListing),
            "unsave-listing" => Ok(ActionKind::UnsaveListing),
            _ => Err(Error::InvalidActionKind(s.to_string())),
        }
    }
}

/// A deferred remote operation waiting in the offline queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueuedAction {
    /// Assigned at enqueue time.
    pub id: ActionId,
    /// Remote operation to replay.
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Request body sent on replay.
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
    /// Number of replay attempts that failed with a retryable error.
    #[serde(default)]
    pub attempts: u32,
    /// Message from the most recent failed attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl QueuedAction {
    /// Creates a new pending action stamped with the current time.
    pub fn new(kind: ActionKind, payload: serde_json::Value) -> Self {
        QueuedAction {
            id: ActionId::new(),
            kind,
            payload,
            enqueued_at: Utc::now(),
            attempts: 0,
            last_error: None,
        }
    }

    /// Records a failed attempt.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.attempts = self.attempts.saturating_add(1);
        self.last_error = Some(error.into());
    }
}

/// An action that will not be replayed again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailedAction {
    pub action: QueuedAction,
    /// Why the action was given up on.
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

impl FailedAction {
    pub fn new(action: QueuedAction, error: impl Into<String>) -> Self {
        FailedAction {
            action,
            error: error.into(),
            failed_at: Utc::now(),
        }
    }
}

/// Lifecycle position of a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionState {
    /// Waiting in the queue.
    Pending,
    /// Currently being replayed.
    InFlight,
    /// Replayed successfully (or never existed).
    Done,
    /// Retained in the dead-letter list.
    Failed,
}

impl ActionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionState::Pending => "pending",
            ActionState::InFlight => "in-flight",
            ActionState::Done => "done",
            ActionState::Failed => "failed",
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
