// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use hs_core::{ConnectionType, ConnectivityEvent, ConnectivityTransition};
use tokio::sync::broadcast::error::TryRecvError;

use super::monitor::{MonitorConfig, NetworkMonitor};
use super::source::ChannelSource;

fn debounced(ms: u64) -> MonitorConfig {
    MonitorConfig {
        debounce: Duration::from_millis(ms),
    }
}

#[tokio::test]
async fn starts_offline_with_no_history() {
    let (_tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, MonitorConfig::default());

    let state = monitor.state();
    assert!(!state.is_online);
    assert_eq!(state.last_online_at, None);
}

#[tokio::test]
async fn emits_transitions_on_flips() {
    let (tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, MonitorConfig::default());
    let mut transitions = monitor.transitions();

    tx.online(ConnectionType::Wifi);
    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Online);
    let online = monitor.state();
    assert!(online.is_online);
    assert_eq!(online.connection_type, ConnectionType::Wifi);
    assert!(online.last_online_at.is_some());

    tx.offline();
    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Offline);
    let offline = monitor.state();
    assert!(!offline.is_online);
    assert_eq!(offline.last_online_at, online.last_online_at);
}

#[tokio::test]
async fn same_side_events_refresh_without_transition() {
    let (tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, MonitorConfig::default());
    let mut transitions = monitor.transitions();
    let mut state = monitor.watch();

    tx.online(ConnectionType::Wifi);
    tx.online(ConnectionType::Cellular);
    tx.offline();

    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Online);
    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Offline);
    assert!(matches!(transitions.try_recv(), Err(TryRecvError::Empty)));

    tx.offline();
    tx.online(ConnectionType::Ethernet);
    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Online);
    state
        .wait_for(|s| s.connection_type == ConnectionType::Ethernet)
        .await
        .unwrap();
}

#[tokio::test]
async fn first_offline_event_is_not_a_transition() {
    let (tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, MonitorConfig::default());
    let mut transitions = monitor.transitions();
    let mut state = monitor.watch();

    tx.offline();
    state.changed().await.unwrap();
    assert!(!state.borrow().is_online);
    assert!(matches!(transitions.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn unknown_reachability_counts_as_online() {
    let (tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, MonitorConfig::default());
    let mut transitions = monitor.transitions();

    tx.send(ConnectivityEvent {
        connected: true,
        internet_reachable: None,
        connection_type: ConnectionType::Wifi,
    });

    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Online);
}

#[tokio::test]
async fn connected_but_unreachable_is_offline() {
    let (tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, MonitorConfig::default());
    let mut transitions = monitor.transitions();

    tx.online(ConnectionType::Wifi);
    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Online);

    tx.send(ConnectivityEvent {
        connected: true,
        internet_reachable: Some(false),
        connection_type: ConnectionType::Wifi,
    });
    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Offline);
    assert!(!monitor.state().is_internet_reachable);
}

#[tokio::test(start_paused = true)]
async fn debounce_swallows_short_flaps() {
    let (tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, debounced(1000));
    let mut transitions = monitor.transitions();

    // The first event is committed immediately
    tx.online(ConnectionType::Wifi);
    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Online);

    tx.offline();
    tokio::time::sleep(Duration::from_millis(500)).await;
    tx.online(ConnectionType::Wifi);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(matches!(transitions.try_recv(), Err(TryRecvError::Empty)));
    assert!(monitor.state().is_online);
}

#[tokio::test(start_paused = true)]
async fn debounce_commits_held_flip() {
    let (tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, debounced(1000));
    let mut transitions = monitor.transitions();

    tx.online(ConnectionType::Wifi);
    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Online);

    tx.offline();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(monitor.state().is_online);

    assert_eq!(transitions.recv().await.unwrap(), ConnectivityTransition::Offline);
    assert!(!monitor.state().is_online);
}

#[tokio::test(start_paused = true)]
async fn debounce_window_is_not_restarted_by_repeats() {
    let (tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, debounced(1000));
    let mut transitions = monitor.transitions();

    tx.offline();
    // A polling source re-reports its state faster than the window
    for _ in 0..6 {
        tx.online(ConnectionType::Wifi);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    assert_eq!(transitions.try_recv().unwrap(), ConnectivityTransition::Online);
    assert!(matches!(transitions.try_recv(), Err(TryRecvError::Empty)));
    assert!(monitor.state().is_online);
}

#[tokio::test]
async fn join_stops_the_task() {
    let (tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, MonitorConfig::default());

    monitor.join().await;

    assert!(!tx.online(ConnectionType::Wifi));
}

#[tokio::test]
async fn closed_source_ends_the_task() {
    let (tx, source) = ChannelSource::new();
    let monitor = NetworkMonitor::spawn(source, MonitorConfig::default());
    let mut state = monitor.watch();
    tx.online(ConnectionType::Wifi);
    drop(tx);

    state.wait_for(|s| s.is_online).await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), monitor.join())
        .await
        .unwrap();
    assert!(monitor.state().is_online);
}
