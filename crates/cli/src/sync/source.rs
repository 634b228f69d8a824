// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity signal sources.
//!
//! A [`ConnectivitySource`] yields raw platform events. Embedders with a
//! native signal push into a [`ChannelSource`]; [`ProbeSource`] derives the
//! signal by periodically opening a TCP connection to the API host.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use hs_core::{ConnectionType, ConnectivityEvent};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

/// Push-based stream of connectivity events.
pub trait ConnectivitySource: Send {
    /// Wait for the next event. Returns `None` once the source is closed.
    fn next_event(&mut self) -> Pin<Box<dyn Future<Output = Option<ConnectivityEvent>> + Send + '_>>;
}

/// Source fed by a [`ConnectivitySender`].
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<ConnectivityEvent>,
}

/// Producer half of a [`ChannelSource`].
#[derive(Debug, Clone)]
pub struct ConnectivitySender {
    tx: mpsc::UnboundedSender<ConnectivityEvent>,
}

impl ChannelSource {
    /// Create a connected sender/source pair.
    pub fn new() -> (ConnectivitySender, ChannelSource) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ConnectivitySender { tx }, ChannelSource { rx })
    }
}

impl ConnectivitySender {
    /// Push an event. Returns false if the source was dropped.
    pub fn send(&self, event: ConnectivityEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Push a connected, reachable event.
    pub fn online(&self, connection_type: ConnectionType) -> bool {
        self.send(ConnectivityEvent::online(connection_type))
    }

    /// Push a disconnected event.
    pub fn offline(&self) -> bool {
        self.send(ConnectivityEvent::offline())
    }
}

impl ConnectivitySource for ChannelSource {
    fn next_event(&mut self) -> Pin<Box<dyn Future<Output = Option<ConnectivityEvent>> + Send + '_>> {
        Box::pin(async move { self.rx.recv().await })
    }
}

/// Source that probes reachability with a TCP connect.
///
/// A successful connect reports online with an unknown transport; any
/// failure or timeout reports offline. Probing runs on its own task from
/// the first [`next_event`](ConnectivitySource::next_event) call, so a
/// caller that drops a pending poll loses neither a probe in progress nor
/// its place in the interval. The task stops once the source is dropped.
#[derive(Debug)]
pub struct ProbeSource {
    probe: Probe,
    interval: Duration,
    events: Option<mpsc::Receiver<ConnectivityEvent>>,
}

#[derive(Debug, Clone)]
struct Probe {
    addr: String,
    timeout: Duration,
}

impl ProbeSource {
    /// Probe `addr` (`host:port`) every `interval`.
    pub fn new(addr: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        ProbeSource {
            probe: Probe {
                addr: addr.into(),
                timeout,
            },
            interval,
            events: None,
        }
    }

    /// Target being probed.
    pub fn addr(&self) -> &str {
        &self.probe.addr
    }

    fn start(&self) -> mpsc::Receiver<ConnectivityEvent> {
        let (tx, rx) = mpsc::channel(1);
        let probe = self.probe.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            loop {
                // First probe fires immediately
                if tx.send(probe.run().await).await.is_err() {
                    break;
                }
                tokio::select! {
                    _ = tx.closed() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            tracing::trace!(addr = %probe.addr, "connectivity probe stopped");
        });
        rx
    }
}

impl Probe {
    async fn run(&self) -> ConnectivityEvent {
        let reachable = matches!(
            tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await,
            Ok(Ok(_))
        );
        tracing::trace!(addr = %self.addr, reachable, "connectivity probe");
        if reachable {
            ConnectivityEvent {
                connected: true,
                internet_reachable: Some(true),
                connection_type: ConnectionType::Unknown,
            }
        } else {
            ConnectivityEvent {
                connected: false,
                internet_reachable: Some(false),
                connection_type: ConnectionType::Unknown,
            }
        }
    }
}

impl ConnectivitySource for ProbeSource {
    fn next_event(&mut self) -> Pin<Box<dyn Future<Output = Option<ConnectivityEvent>> + Send + '_>> {
        Box::pin(async move {
            if self.events.is_none() {
                self.events = Some(self.start());
            }
            match self.events.as_mut() {
                Some(events) => events.recv().await,
                None => None,
            }
        })
    }
}
