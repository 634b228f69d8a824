// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue service.
//!
//! Sole mutator of the persisted action list. Actions are appended while
//! offline and replayed in FIFO order by [`OfflineQueue::process_queue`].
//!
//! Every mutation re-reads the store under an exclusive guard and writes
//! the result back, so an enqueue that lands while a drain is waiting on
//! the network is never overwritten by a stale snapshot. The guard pairs
//! an in-process mutex with the store's own lock, which keeps other
//! processes sharing the same data directory out as well. The network
//! call itself is made without holding it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use hs_core::{ActionId, ActionKind, ActionState, FailedAction, QueuedAction};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::listeners::{Listeners, Subscription};
use super::remote::{Remote, ReplayError};
use crate::store::{QueueStore, StoreError, StoreLock, StoreResult};

/// Tunables for the queue service.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Upper bound on a single replay; expiry counts as retryable.
    pub replay_timeout: Duration,
    /// Retryable failures allowed before an action is given up on (0 = unlimited).
    pub max_attempts: u32,
    /// Keep given-up actions in the dead-letter list instead of dropping them.
    pub keep_failed: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            replay_timeout: Duration::from_secs(30),
            max_attempts: 0,
            keep_failed: true,
        }
    }
}

/// Summary of a completed drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Actions replayed successfully and removed.
    pub replayed: usize,
    /// Actions removed because they can never succeed.
    pub discarded: usize,
    /// Actions still queued when the drain finished.
    pub remaining: usize,
}

/// Why a drain did not complete.
///
/// Cloneable so every caller joined to one drain receives the same outcome.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DrainError {
    /// A retryable failure stopped the drain; the action and everything
    /// after it are still queued.
    #[error("sync halted at action {action}: {reason}")]
    Halted { action: ActionId, reason: String },

    /// The durable store failed.
    #[error("store error: {0}")]
    Store(Arc<StoreError>),

    /// The remote returned an error that could not be classified.
    #[error("sync aborted: {0}")]
    Aborted(String),

    /// The drain this call joined was dropped before it finished.
    #[error("sync abandoned before completion")]
    Abandoned,
}

impl From<StoreError> for DrainError {
    fn from(err: StoreError) -> Self {
        DrainError::Store(Arc::new(err))
    }
}

/// Result of one drain.
pub type DrainResult = Result<DrainReport, DrainError>;

type DrainSlot = Option<watch::Receiver<Option<DrainResult>>>;

/// Offline queue service.
///
/// Cheap to clone; clones share the same store, listeners, and drain guard.
#[derive(Clone)]
pub struct OfflineQueue {
    inner: Arc<Inner>,
}

struct Inner {
    store: QueueStore,
    remote: Arc<dyn Remote>,
    config: QueueConfig,
    /// Serializes read-modify-write sequences against the store.
    write_lock: tokio::sync::Mutex<()>,
    /// Last snapshot read or written.
    cache: Mutex<Option<Vec<QueuedAction>>>,
    listeners: Listeners,
    /// Outcome channel of the drain in flight, if any.
    drain: Mutex<DrainSlot>,
    in_flight: Mutex<Option<ActionId>>,
}

/// Clears the in-flight markers even if the leading drain is dropped.
struct DrainGuard {
    inner: Arc<Inner>,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        *lock(&self.inner.in_flight) = None;
        *lock(&self.inner.drain) = None;
    }
}

/// Held across every read-modify-write of the store.
struct Exclusive<'a> {
    _local: tokio::sync::MutexGuard<'a, ()>,
    _store: StoreLock,
}

enum Role {
    Leader(watch::Sender<Option<DrainResult>>),
    Follower(watch::Receiver<Option<DrainResult>>),
}

enum Settle {
    Done,
    Failed(String),
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl OfflineQueue {
    /// Create a service over the given store and remote.
    pub fn new(store: QueueStore, remote: Arc<dyn Remote>, config: QueueConfig) -> Self {
        OfflineQueue {
            inner: Arc::new(Inner {
                store,
                remote,
                config,
                write_lock: tokio::sync::Mutex::new(()),
                cache: Mutex::new(None),
                listeners: Listeners::default(),
                drain: Mutex::new(None),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }

    /// Record a new action and persist it.
    ///
    /// Works regardless of connectivity.
    pub async fn enqueue(
        &self,
        kind: ActionKind,
        payload: serde_json::Value,
    ) -> StoreResult<QueuedAction> {
        let action = QueuedAction::new(kind, payload);
        self.enqueue_action(action.clone()).await?;
        Ok(action)
    }

    /// Append an already-built action to the tail of the queue.
    pub async fn enqueue_action(&self, action: QueuedAction) -> StoreResult<()> {
        let _guard = self.exclusive().await?;
        let mut queue = self.inner.store.load().await?;
        info!(id = %action.id, kind = %action.kind, position = queue.len(), "enqueued action");
        queue.push(action);
        self.commit(queue).await
    }

    /// Current queue snapshot, from cache when available.
    pub async fn get_queue(&self) -> StoreResult<Vec<QueuedAction>> {
        let cached = lock(&self.inner.cache).clone();
        if let Some(cached) = cached {
            return Ok(cached);
        }
        let queue = self.inner.store.load().await?;
        *lock(&self.inner.cache) = Some(queue.clone());
        Ok(queue)
    }

    /// Re-read the store, notifying listeners if another writer changed it.
    pub async fn reload(&self) -> StoreResult<Vec<QueuedAction>> {
        let _guard = self.exclusive().await?;
        let queue = self.inner.store.load().await?;
        let cached = lock(&self.inner.cache).clone();
        if cached.as_ref() != Some(&queue) {
            self.publish(queue.clone());
        }
        Ok(queue)
    }

    /// Number of pending actions.
    pub async fn len(&self) -> StoreResult<usize> {
        Ok(self.get_queue().await?.len())
    }

    /// Check if no actions are pending.
    pub async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Register a listener called with the new snapshot after every change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[QueuedAction]) + Send + Sync + 'static,
    {
        self.inner.listeners.add(listener)
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Drop a pending action. Returns false if it was not queued.
    pub async fn remove(&self, id: ActionId) -> StoreResult<bool> {
        let _guard = self.exclusive().await?;
        let mut queue = self.inner.store.load().await?;
        let before = queue.len();
        queue.retain(|a| a.id != id);
        if queue.len() == before {
            return Ok(false);
        }
        info!(%id, "removed queued action");
        self.commit(queue).await?;
        Ok(true)
    }

    /// Actions that were given up on.
    pub async fn failed(&self) -> StoreResult<Vec<FailedAction>> {
        self.inner.store.load_failed().await
    }

    /// Empty the dead-letter list.
    pub async fn clear_failed(&self) -> StoreResult<usize> {
        let _guard = self.exclusive().await?;
        let failed = self.inner.store.load_failed().await?;
        self.inner.store.save_failed(&[]).await?;
        Ok(failed.len())
    }

    /// Move a dead-letter action back to the tail of the queue with a fresh
    /// attempt count. Returns false if no such failed action exists.
    pub async fn retry_failed(&self, id: ActionId) -> StoreResult<bool> {
        let _guard = self.exclusive().await?;
        let mut failed = self.inner.store.load_failed().await?;
        let Some(pos) = failed.iter().position(|f| f.action.id == id) else {
            return Ok(false);
        };
        let mut action = failed.remove(pos).action;
        action.attempts = 0;
        action.last_error = None;

        let mut queue = self.inner.store.load().await?;
        queue.push(action);
        // Queue first: a crash in between leaves a duplicate, never a loss.
        self.inner.store.save(&queue).await?;
        self.inner.store.save_failed(&failed).await?;
        info!(%id, "requeued failed action");
        self.publish(queue);
        Ok(true)
    }

    /// Where `id` currently sits in its lifecycle.
    pub async fn action_state(&self, id: ActionId) -> StoreResult<ActionState> {
        if *lock(&self.inner.in_flight) == Some(id) {
            return Ok(ActionState::InFlight);
        }
        if self.get_queue().await?.iter().any(|a| a.id == id) {
            return Ok(ActionState::Pending);
        }
        if self.failed().await?.iter().any(|f| f.action.id == id) {
            return Ok(ActionState::Failed);
        }
        Ok(ActionState::Done)
    }

    /// Replay one action directly, bounded by the replay timeout.
    ///
    /// Does not touch the queue.
    pub async fn replay_now(&self, action: &QueuedAction) -> Result<(), ReplayError> {
        let timeout = self.inner.config.replay_timeout;
        match tokio::time::timeout(timeout, self.inner.remote.replay(action)).await {
            Ok(result) => result,
            Err(_) => Err(ReplayError::Retryable(format!(
                "replay timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }

    /// Replay every pending action in FIFO order.
    ///
    /// At most one drain runs at a time. A call made while a drain is in
    /// flight waits for it and returns the same outcome.
    pub async fn process_queue(&self) -> DrainResult {
        let role = {
            let mut slot = lock(&self.inner.drain);
            match slot.as_ref() {
                Some(rx) => Role::Follower(rx.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    *slot = Some(rx);
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Follower(mut rx) => {
                debug!("joining drain already in flight");
                let outcome = match rx.wait_for(|r| r.is_some()).await {
                    Ok(r) => r.clone(),
                    Err(_) => None,
                };
                outcome.unwrap_or(Err(DrainError::Abandoned))
            }
            Role::Leader(tx) => {
                let guard = DrainGuard {
                    inner: Arc::clone(&self.inner),
                };
                let result = self.drain().await;
                drop(guard);
                let _ = tx.send(Some(result.clone()));
                result
            }
        }
    }

    async fn drain(&self) -> DrainResult {
        let pending = {
            let _guard = self.exclusive().await?;
            self.inner.store.load().await?
        };
        if pending.is_empty() {
            return Ok(DrainReport::default());
        }

        info!(count = pending.len(), "draining offline queue");
        let mut report = DrainReport::default();

        let ids: Vec<ActionId> = pending.iter().map(|a| a.id).collect();
        for id in ids {
            let Some(action) = self.begin_replay(id).await? else {
                debug!(%id, "action removed before replay, skipping");
                continue;
            };
            let outcome = self.replay_now(&action).await;
            *lock(&self.inner.in_flight) = None;

            match outcome {
                Ok(()) => {
                    debug!(id = %action.id, kind = %action.kind, "action replayed");
                    self.settle(action.id, Settle::Done).await?;
                    report.replayed += 1;
                }
                Err(ReplayError::Terminal { message, .. }) => {
                    warn!(id = %action.id, kind = %action.kind, %message, "action rejected, discarding");
                    self.settle(action.id, Settle::Failed(message)).await?;
                    report.discarded += 1;
                }
                Err(ReplayError::Retryable(reason)) => {
                    if self.record_retry(action.id, &reason).await? {
                        report.discarded += 1;
                        continue;
                    }
                    warn!(id = %action.id, kind = %action.kind, %reason, "replay failed, halting drain");
                    return Err(DrainError::Halted {
                        action: action.id,
                        reason,
                    });
                }
                Err(ReplayError::Unclassified(reason)) => {
                    warn!(id = %action.id, %reason, "unclassified replay error, aborting drain");
                    return Err(DrainError::Aborted(reason));
                }
            }
        }

        report.remaining = self.len().await?;
        info!(
            replayed = report.replayed,
            discarded = report.discarded,
            remaining = report.remaining,
            "drain complete"
        );
        Ok(report)
    }

    /// Mark `id` in flight and return its stored copy, or `None` if it
    /// left the queue since the drain started.
    async fn begin_replay(&self, id: ActionId) -> StoreResult<Option<QueuedAction>> {
        let _guard = self.exclusive().await?;
        let action = self
            .inner
            .store
            .load()
            .await?
            .into_iter()
            .find(|a| a.id == id);
        if action.is_some() {
            *lock(&self.inner.in_flight) = Some(id);
        }
        Ok(action)
    }

    /// Remove a replayed or rejected action from the queue.
    async fn settle(&self, id: ActionId, outcome: Settle) -> StoreResult<()> {
        let _guard = self.exclusive().await?;
        let mut queue = self.inner.store.load().await?;
        let Some(pos) = queue.iter().position(|a| a.id == id) else {
            // Removed by the user while the replay was in flight.
            return Ok(());
        };
        let action = queue.remove(pos);

        if let Settle::Failed(error) = outcome {
            self.dead_letter(action, error).await?;
        }
        self.commit(queue).await
    }

    /// Count a retryable failure. Returns true if the action exceeded
    /// `max_attempts` and was moved out of the queue.
    async fn record_retry(&self, id: ActionId, reason: &str) -> StoreResult<bool> {
        let _guard = self.exclusive().await?;
        let mut queue = self.inner.store.load().await?;
        let Some(pos) = queue.iter().position(|a| a.id == id) else {
            return Ok(false);
        };
        queue[pos].record_failure(reason);

        let max = self.inner.config.max_attempts;
        let exhausted = max > 0 && queue[pos].attempts >= max;
        if exhausted {
            let action = queue.remove(pos);
            warn!(%id, attempts = action.attempts, "giving up on action");
            self.dead_letter(action, format!("gave up after {} attempts: {}", max, reason))
                .await?;
        }
        self.commit(queue).await?;
        Ok(exhausted)
    }

    async fn dead_letter(&self, action: QueuedAction, error: String) -> StoreResult<()> {
        if !self.inner.config.keep_failed {
            return Ok(());
        }
        let mut failed = self.inner.store.load_failed().await?;
        failed.push(FailedAction::new(action, error));
        self.inner.store.save_failed(&failed).await
    }

    /// Persist, refresh the cache, and notify. Caller holds [`Self::exclusive`].
    async fn commit(&self, queue: Vec<QueuedAction>) -> StoreResult<()> {
        self.inner.store.save(&queue).await?;
        self.publish(queue);
        Ok(())
    }

    async fn exclusive(&self) -> StoreResult<Exclusive<'_>> {
        let local = self.inner.write_lock.lock().await;
        let store = self.inner.store.lock().await?;
        Ok(Exclusive {
            _local: local,
            _store: store,
        })
    }

    fn publish(&self, queue: Vec<QueuedAction>) {
        self.inner.listeners.notify(&queue);
        *lock(&self.inner.cache) = Some(queue);
    }
}
