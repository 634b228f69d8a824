// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hs_core::{ActionId, ActionKind, QueuedAction};
use serde_json::json;
use tokio::sync::Semaphore;

use super::queue::{OfflineQueue, QueueConfig};
use super::remote::{Remote, ReplayError};
use crate::store::{MemoryStore, QueueStore};

/// Scriptable in-memory remote.
#[derive(Clone, Default)]
pub struct MockRemote {
    inner: Arc<MockInner>,
}

#[derive(Default)]
struct MockInner {
    calls: AtomicUsize,
    replayed: Mutex<Vec<QueuedAction>>,
    by_id: Mutex<HashMap<ActionId, ReplayError>>,
    by_kind: Mutex<HashMap<ActionKind, ReplayError>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every replay of `id` fails with `err`.
    pub fn fail_id(&self, id: ActionId, err: ReplayError) {
        self.inner.by_id.lock().unwrap().insert(id, err);
    }

    /// Every replay of `kind` fails with `err`.
    pub fn fail_kind(&self, kind: ActionKind, err: ReplayError) {
        self.inner.by_kind.lock().unwrap().insert(kind, err);
    }

    pub fn clear_failures(&self) {
        self.inner.by_id.lock().unwrap().clear();
        self.inner.by_kind.lock().unwrap().clear();
    }

    /// Block replays until [`release`](Self::release) is called.
    pub fn hold(&self) {
        *self.inner.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let held and future replays through.
    pub fn release(&self) {
        if let Some(gate) = self.inner.gate.lock().unwrap().take() {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    /// Number of replay calls started.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Actions replayed successfully, in order.
    pub fn replayed(&self) -> Vec<QueuedAction> {
        self.inner.replayed.lock().unwrap().clone()
    }

    pub fn replayed_ids(&self) -> Vec<ActionId> {
        self.replayed().iter().map(|a| a.id).collect()
    }

    /// Wait until at least `n` replay calls have started.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls() < n {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .unwrap();
    }
}

impl Remote for MockRemote {
    fn replay<'a>(
        &'a self,
        action: &'a QueuedAction,
    ) -> Pin<Box<dyn Future<Output = Result<(), ReplayError>> + Send + 'a>> {
        Box::pin(async move {
            self.inner.calls.fetch_add(1, Ordering::SeqCst);

            let gate = self.inner.gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                let _permit = gate.acquire().await.unwrap();
            }

            let scripted = self
                .inner
                .by_id
                .lock()
                .unwrap()
                .get(&action.id)
                .cloned()
                .or_else(|| self.inner.by_kind.lock().unwrap().get(&action.kind).cloned());
            if let Some(err) = scripted {
                return Err(err);
            }

            self.inner.replayed.lock().unwrap().push(action.clone());
            Ok(())
        })
    }
}

pub fn retryable() -> ReplayError {
    ReplayError::Retryable("503 Service Unavailable".into())
}

pub fn terminal() -> ReplayError {
    ReplayError::Terminal {
        status: Some(422),
        message: "422 Unprocessable Entity".into(),
    }
}

/// Listing payload tagged with `n`.
pub fn payload(n: u64) -> serde_json::Value {
    json!({ "listingId": n })
}

/// Queue service over `kv` and `remote` with default config.
pub fn make_queue(kv: &MemoryStore, remote: &MockRemote) -> OfflineQueue {
    make_queue_with(kv, remote, QueueConfig::default())
}

pub fn make_queue_with(kv: &MemoryStore, remote: &MockRemote, config: QueueConfig) -> OfflineQueue {
    OfflineQueue::new(
        QueueStore::new(Arc::new(kv.clone())),
        Arc::new(remote.clone()),
        config,
    )
}
