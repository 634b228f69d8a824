// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity signal types.
//!
//! [`ConnectivityEvent`] is the raw platform signal; [`ConnectivityState`]
//! is the normalized view the rest of the system reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transport kind reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Wifi,
    Cellular,
    Ethernet,
    None,
    #[default]
    Unknown,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Wifi => "wifi",
            ConnectionType::Cellular => "cellular",
            ConnectionType::Ethernet => "ethernet",
            ConnectionType::None => "none",
            ConnectionType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConnectionType {
    type Err = std::convert::Infallible;

    /// Unrecognized transports map to `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "wifi" => ConnectionType::Wifi,
            "cellular" => ConnectionType::Cellular,
            "ethernet" => ConnectionType::Ethernet,
            "none" => ConnectionType::None,
            _ => ConnectionType::Unknown,
        })
    }
}

/// One push from the platform connectivity signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityEvent {
    /// Link-layer connection present.
    pub connected: bool,
    /// `None` while the platform has not determined reachability yet.
    pub internet_reachable: Option<bool>,
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
}

impl ConnectivityEvent {
    /// A connected, reachable event on the given transport.
    pub fn online(connection_type: ConnectionType) -> Self {
        ConnectivityEvent {
            connected: true,
            internet_reachable: Some(true),
            connection_type,
        }
    }

    /// A disconnected event.
    pub fn offline() -> Self {
        ConnectivityEvent {
            connected: false,
            internet_reachable: Some(false),
            connection_type: ConnectionType::None,
        }
    }

    /// Whether this event means the remote API can be reached.
    ///
    /// Unknown reachability on a live link counts as online.
    pub fn is_online(&self) -> bool {
        self.connected && self.internet_reachable != Some(false)
    }
}

/// Normalized connectivity view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityState {
    pub is_online: bool,
    pub is_internet_reachable: bool,
    pub connection_type: ConnectionType,
    /// Time of the last offline-to-online transition.
    pub last_online_at: Option<DateTime<Utc>>,
}

impl ConnectivityState {
    /// Folds an event into the state, stamping `last_online_at` when the
    /// event brings the state online.
    pub fn apply(&self, event: &ConnectivityEvent, now: DateTime<Utc>) -> ConnectivityState {
        let is_online = event.is_online();
        let last_online_at = if is_online && !self.is_online {
            Some(now)
        } else {
            self.last_online_at
        };
        ConnectivityState {
            is_online,
            is_internet_reachable: event.internet_reachable.unwrap_or(event.connected),
            connection_type: event.connection_type,
            last_online_at,
        }
    }
}

/// A flip of the online flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityTransition {
    Online,
    Offline,
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
