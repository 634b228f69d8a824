// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! hs-core: Shared data model for the homestead offline sync layer.
//!
//! This crate provides the queued action, connectivity, and sync status
//! types used by the queue service, network monitor, and orchestrator.

pub mod action;
pub mod connectivity;
pub mod error;
pub mod status;

pub use action::{ActionId, ActionKind, ActionState, FailedAction, QueuedAction};
pub use connectivity::{
    ConnectionType, ConnectivityEvent, ConnectivityState, ConnectivityTransition,
};
pub use error::{Error, Result};
pub use status::{SyncStatus, SyncView};
