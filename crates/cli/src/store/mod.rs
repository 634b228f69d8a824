// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage for the offline queue.
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌─────────────┐
//! │ QueueStore  │────►│ KeyValueStore │────►│ FileStore / │
//! │ (typed)     │◄────│    (trait)    │◄────│ MemoryStore │
//! └─────────────┘     └───────────────┘     └─────────────┘
//! ```
//!
//! The queue is serialized as one JSON array under a single key. Dead-letter
//! actions live under `<key>.failed`.

mod kv;
mod queue_store;

pub use kv::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreLock, StoreResult};
pub use queue_store::{QueueStore, DEFAULT_QUEUE_KEY};
