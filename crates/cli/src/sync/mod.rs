// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue and connectivity-driven sync.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Connectivity │────►│   Network    │────►│    Sync     │
//! │   Source     │     │   Monitor    │     │ Orchestrator│
//! └──────────────┘     └──────────────┘     └──────┬──────┘
//!                                                  │ process_queue
//!                                                  ▼
//! ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  QueueStore  │◄────│ OfflineQueue │────►│   Remote    │
//! │  (durable)   │     │  (service)   │     │   (trait)   │
//! └──────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! # Features
//!
//! - FIFO replay with at most one drain in flight (later callers join it)
//! - Retryable failures halt the drain; rejections are dead-lettered
//! - Per-action replay timeout
//! - Debounced connectivity transitions
//! - Injectable store, remote, and connectivity source for testing

mod listeners;
mod monitor;
mod orchestrator;
mod queue;
mod remote;
mod source;

pub use listeners::Subscription;
pub use monitor::{MonitorConfig, NetworkMonitor};
pub use orchestrator::{Dispatch, DispatchError, SyncOrchestrator};
pub use queue::{DrainError, DrainReport, DrainResult, OfflineQueue, QueueConfig};
pub use remote::{classify_status, HttpRemote, Remote, ReplayError, Route};
pub use source::{ChannelSource, ConnectivitySender, ConnectivitySource, ProbeSource};

#[cfg(test)]
pub(crate) mod test_helpers;


#[cfg(test)]
mod monitor_tests;
