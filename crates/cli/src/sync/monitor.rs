// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network status monitor.
//!
//! Runs a background task that reads a [`ConnectivitySource`], folds events
//! into a [`ConnectivityState`], and announces online/offline flips. The
//! monitor only observes; it never starts a drain itself.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use hs_core::{ConnectivityEvent, ConnectivityState, ConnectivityTransition};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::source::ConnectivitySource;

/// Configuration for the network monitor.
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    /// How long a flipped online value must hold before it is committed.
    /// Zero commits every flip immediately.
    pub debounce: Duration,
}

/// Handle to the running monitor task.
pub struct NetworkMonitor {
    state: watch::Receiver<ConnectivityState>,
    transitions: broadcast::Sender<ConnectivityTransition>,
    cancel_token: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl NetworkMonitor {
    /// Start monitoring `source` on the current tokio runtime.
    pub fn spawn<S>(source: S, config: MonitorConfig) -> Self
    where
        S: ConnectivitySource + 'static,
    {
        let (state_tx, state) = watch::channel(ConnectivityState::default());
        let (transitions, _) = broadcast::channel(64);
        let cancel_token = CancellationToken::new();

        let task = MonitorTask {
            source,
            config,
            state_tx,
            transitions: transitions.clone(),
            cancel_token: cancel_token.clone(),
            pending: None,
            seen_event: false,
        };
        let handle = tokio::spawn(task.run());

        NetworkMonitor {
            state,
            transitions,
            cancel_token,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Latest committed connectivity state.
    pub fn state(&self) -> ConnectivityState {
        *self.state.borrow()
    }

    /// Receiver that observes every committed state.
    pub fn watch(&self) -> watch::Receiver<ConnectivityState> {
        self.state.clone()
    }

    /// Receiver for online/offline flips emitted after this call.
    pub fn transitions(&self) -> broadcast::Receiver<ConnectivityTransition> {
        self.transitions.subscribe()
    }

    /// Stop the background task.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    /// Stop the background task and wait for it to exit.
    pub async fn join(&self) {
        self.shutdown();
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Drop for NetworkMonitor {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

struct MonitorTask<S> {
    source: S,
    config: MonitorConfig,
    state_tx: watch::Sender<ConnectivityState>,
    transitions: broadcast::Sender<ConnectivityTransition>,
    cancel_token: CancellationToken,
    /// Flip waiting out the debounce window.
    pending: Option<(ConnectivityEvent, Instant)>,
    seen_event: bool,
}

impl<S: ConnectivitySource> MonitorTask<S> {
    async fn run(mut self) {
        loop {
            let deadline = self.pending.map(|(_, at)| at);
            tokio::select! {
                _ = self.cancel_token.cancelled() => break,
                event = self.source.next_event() => match event {
                    Some(event) => self.on_event(event),
                    None => {
                        debug!("connectivity source closed");
                        break;
                    }
                },
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some((event, _)) = self.pending.take() {
                        self.commit(&event);
                    }
                }
            }
        }
    }

    fn on_event(&mut self, event: ConnectivityEvent) {
        let current = *self.state_tx.borrow();
        let first = !self.seen_event;
        self.seen_event = true;

        if event.is_online() == current.is_online && !first {
            if self.pending.take().is_some() {
                debug!("connectivity flap settled back");
            }
            // Same side: refresh transport and reachability without a transition.
            self.state_tx.send_replace(current.apply(&event, Utc::now()));
            return;
        }

        if first || self.config.debounce.is_zero() {
            self.pending = None;
            self.commit(&event);
        } else {
            // A repeat of the pending flip keeps its deadline; only a
            // contrary event (handled above) cancels it.
            let deadline = match self.pending {
                Some((_, at)) => at,
                None => Instant::now() + self.config.debounce,
            };
            self.pending = Some((event, deadline));
        }
    }

    fn commit(&mut self, event: &ConnectivityEvent) {
        let previous = *self.state_tx.borrow();
        let next = previous.apply(event, Utc::now());
        self.state_tx.send_replace(next);

        if next.is_online == previous.is_online {
            return;
        }
        let transition = if next.is_online {
            info!(connection_type = %next.connection_type, "network online");
            ConnectivityTransition::Online
        } else {
            info!("network offline");
            ConnectivityTransition::Offline
        };
        let _ = self.transitions.send(transition);
    }
}
