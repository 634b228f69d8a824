// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync orchestrator.
//!
//! Combines the network monitor and the offline queue into the state
//! consumed by the UI:
//!
//! ```text
//!            online && pending > 0
//!   idle ───────────────────────────► syncing ──┐
//!   error ──────────────────────────►    │  ▲   │ drain ok, still pending
//!     ▲        drain failed              │  └───┘ (drain again)
//!     └──────────────────────────────────┤
//!                                        │ queue empty or offline
//!                                        ▼
//!                                      idle
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use hs_core::{
    ActionKind, ConnectivityState, ConnectivityTransition, QueuedAction, SyncStatus, SyncView,
};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::listeners::Subscription;
use super::monitor::NetworkMonitor;
use super::queue::{DrainReport, DrainResult, OfflineQueue};
use super::remote::ReplayError;
use crate::store::{StoreError, StoreResult};

/// Outcome of [`SyncOrchestrator::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Delivered to the remote immediately.
    Sent,
    /// Stored for a later drain.
    Queued(QueuedAction),
}

/// Error type for [`SyncOrchestrator::dispatch`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The action could not be queued.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The server rejected the action.
    #[error("rejected by server: {message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },

    /// The remote failed in a way that is neither retryable nor a rejection.
    #[error("remote error: {0}")]
    Remote(String),
}

/// Reactive sync state machine.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SyncOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    queue: OfflineQueue,
    connectivity: watch::Receiver<ConnectivityState>,
    view: watch::Sender<SyncView>,
    cancel_token: CancellationToken,
    subscription: Mutex<Option<Subscription>>,
}

impl SyncOrchestrator {
    /// Build an orchestrator over `queue`, reading connectivity from `connectivity`.
    pub async fn new(
        queue: OfflineQueue,
        connectivity: watch::Receiver<ConnectivityState>,
    ) -> StoreResult<Self> {
        let pending = queue.len().await?;
        let is_online = connectivity.borrow().is_online;
        let (view, _) = watch::channel(SyncView::new(is_online, SyncStatus::Idle, pending));

        let view_tx = view.clone();
        let subscription = queue.subscribe(move |snapshot| {
            let count = snapshot.len();
            view_tx.send_if_modified(|v| {
                let changed = v.pending_actions != count;
                v.pending_actions = count;
                changed
            });
        });

        Ok(SyncOrchestrator {
            inner: Arc::new(Inner {
                queue,
                connectivity,
                view,
                cancel_token: CancellationToken::new(),
                subscription: Mutex::new(Some(subscription)),
            }),
        })
    }

    /// Build an orchestrator wired to a running monitor and start it.
    pub async fn attach(
        queue: OfflineQueue,
        monitor: &NetworkMonitor,
    ) -> StoreResult<(Self, JoinHandle<()>)> {
        let transitions = monitor.transitions();
        let orchestrator = Self::new(queue, monitor.watch()).await?;
        let handle = orchestrator.spawn(transitions);
        Ok((orchestrator, handle))
    }

    /// Current UI projection.
    pub fn view(&self) -> SyncView {
        *self.inner.view.borrow()
    }

    /// Receiver that observes every view change.
    pub fn watch_view(&self) -> watch::Receiver<SyncView> {
        self.inner.view.subscribe()
    }

    /// Current sync status.
    pub fn sync_status(&self) -> SyncStatus {
        self.view().sync_status
    }

    /// The queue this orchestrator drives.
    pub fn queue(&self) -> &OfflineQueue {
        &self.inner.queue
    }

    /// Force a display status without running a drain.
    pub fn set_sync_status(&self, status: SyncStatus) {
        self.set_status(status);
    }

    /// Drain the queue now, regardless of connectivity transitions.
    ///
    /// Actions enqueued while a pass is running are picked up by further
    /// passes as long as the network stays online, so the status only
    /// settles to idle once the queue is empty or the network is gone.
    /// The returned report totals every pass.
    pub async fn refresh_queue(&self) -> DrainResult {
        self.set_status(SyncStatus::Syncing);
        let mut total = DrainReport::default();
        let result = loop {
            let report = match self.inner.queue.process_queue().await {
                Ok(report) => report,
                Err(e) => break Err(e),
            };
            total.replayed += report.replayed;
            total.discarded += report.discarded;
            total.remaining = report.remaining;

            let is_online = self.inner.connectivity.borrow().is_online;
            if report.remaining == 0 || !is_online {
                break Ok(total);
            }
            debug!(remaining = report.remaining, "actions queued during drain, draining again");
        };
        match &result {
            Ok(report) => {
                info!(
                    replayed = report.replayed,
                    discarded = report.discarded,
                    "sync finished"
                );
                self.set_status(SyncStatus::Idle);
            }
            Err(e) => {
                warn!(error = %e, "sync failed");
                self.set_status(SyncStatus::Error);
            }
        }
        result
    }

    /// Send an action now if possible, otherwise queue it.
    ///
    /// Goes straight to the remote only when online with nothing queued,
    /// so earlier actions are never overtaken.
    pub async fn dispatch(
        &self,
        kind: ActionKind,
        payload: serde_json::Value,
    ) -> Result<Dispatch, DispatchError> {
        let mut action = QueuedAction::new(kind, payload);
        let is_online = self.inner.connectivity.borrow().is_online;

        if !is_online || !self.inner.queue.is_empty().await? {
            self.inner.queue.enqueue_action(action.clone()).await?;
            return Ok(Dispatch::Queued(action));
        }

        match self.inner.queue.replay_now(&action).await {
            Ok(()) => Ok(Dispatch::Sent),
            Err(ReplayError::Retryable(reason)) => {
                debug!(kind = %kind, %reason, "direct send failed, queuing");
                action.record_failure(reason);
                self.inner.queue.enqueue_action(action.clone()).await?;
                Ok(Dispatch::Queued(action))
            }
            Err(ReplayError::Terminal { status, message }) => {
                Err(DispatchError::Rejected { status, message })
            }
            Err(ReplayError::Unclassified(reason)) => Err(DispatchError::Remote(reason)),
        }
    }

    /// Run the transition loop on the current runtime.
    ///
    /// `transitions` should be subscribed before any event it must see is
    /// emitted; the loop also syncs once at start if already online.
    pub fn spawn(
        &self,
        mut transitions: broadcast::Receiver<ConnectivityTransition>,
    ) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            if this.inner.connectivity.borrow().is_online {
                this.on_online().await;
            }
            loop {
                tokio::select! {
                    _ = this.inner.cancel_token.cancelled() => break,
                    transition = transitions.recv() => match transition {
                        Ok(ConnectivityTransition::Online) => this.on_online().await,
                        Ok(ConnectivityTransition::Offline) => this.set_online(false),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!(skipped, "connectivity transitions lagged, resyncing");
                            let online = this.inner.connectivity.borrow().is_online;
                            if online {
                                this.on_online().await;
                            } else {
                                this.set_online(false);
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            debug!("sync orchestrator stopped");
        })
    }

    /// Stop the transition loop and detach from the queue.
    pub fn shutdown(&self) {
        self.inner.cancel_token.cancel();
        self.inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    async fn on_online(&self) {
        self.set_online(true);
        let pending = match self.inner.queue.reload().await {
            Ok(queue) => queue.len(),
            Err(e) => {
                warn!(error = %e, "failed to read offline queue");
                self.set_status(SyncStatus::Error);
                return;
            }
        };
        if pending == 0 {
            return;
        }

        info!(pending, "network online, syncing queued actions");
        // The drain runs on its own task so offline flips keep updating the view.
        let this = self.clone();
        tokio::spawn(async move {
            let _ = this.refresh_queue().await;
        });
    }

    fn set_online(&self, is_online: bool) {
        self.inner.view.send_if_modified(|v| {
            let changed = v.is_online != is_online;
            v.is_online = is_online;
            v.is_offline = !is_online;
            changed
        });
    }

    fn set_status(&self, status: SyncStatus) {
        self.inner.view.send_if_modified(|v| {
            let changed = v.sync_status != status;
            if changed {
                debug!(from = %v.sync_status, to = %status, "sync status");
            }
            v.sync_status = status;
            changed
        });
    }
}
