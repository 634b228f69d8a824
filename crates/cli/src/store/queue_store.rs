// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed persistence for queued and dead-letter actions.

use std::sync::Arc;

use hs_core::{FailedAction, QueuedAction};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::kv::{KeyValueStore, StoreError, StoreLock, StoreResult};

/// Key the queue is stored under unless configured otherwise.
pub const DEFAULT_QUEUE_KEY: &str = "offline_queue";

/// Persists the ordered action list as a JSON array under one key.
///
/// Reads and writes are not atomic with respect to each other; callers
/// that read-modify-write must hold [`QueueStore::lock`] across the sequence.
#[derive(Clone)]
pub struct QueueStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    failed_key: String,
}

impl QueueStore {
    /// Create a queue store using [`DEFAULT_QUEUE_KEY`].
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, DEFAULT_QUEUE_KEY)
    }

    /// Create a queue store under a custom key.
    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let failed_key = format!("{}.failed", key);
        QueueStore {
            kv,
            key,
            failed_key,
        }
    }

    /// Key holding the pending queue.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Exclusive lock covering both the queue and its dead-letter list.
    pub async fn lock(&self) -> StoreResult<StoreLock> {
        self.kv.lock(&self.key).await
    }

    /// Load the pending actions in FIFO order.
    pub async fn load(&self) -> StoreResult<Vec<QueuedAction>> {
        self.read_list(&self.key).await
    }

    /// Replace the pending actions.
    pub async fn save(&self, actions: &[QueuedAction]) -> StoreResult<()> {
        self.write_list(&self.key, actions).await
    }

    /// Load the dead-letter list.
    pub async fn load_failed(&self) -> StoreResult<Vec<FailedAction>> {
        self.read_list(&self.failed_key).await
    }

    /// Replace the dead-letter list. An empty list removes the key.
    pub async fn save_failed(&self, failed: &[FailedAction]) -> StoreResult<()> {
        if failed.is_empty() {
            return self.kv.remove_item(&self.failed_key).await;
        }
        self.write_list(&self.failed_key, failed).await
    }

    async fn read_list<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let Some(raw) = self.kv.get_item(key).await? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            source: e,
        })
    }

    async fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let json = serde_json::to_string(items).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            source: e,
        })?;
        self.kv.set_item(key, json).await
    }
}
