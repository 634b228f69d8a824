// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

#[parameterized(
    reachable = { true, Some(true), true },
    unknown_reachability = { true, None, true },
    captive_portal = { true, Some(false), false },
    no_link = { false, None, false },
    no_link_reachable_flag = { false, Some(true), false },
)]
fn event_is_online(connected: bool, reachable: Option<bool>, expected: bool) {
    let event = ConnectivityEvent {
        connected,
        internet_reachable: reachable,
        connection_type: ConnectionType::Wifi,
    };
    assert_eq!(event.is_online(), expected);
}

#[parameterized(
    wifi = { "wifi", ConnectionType::Wifi },
    cellular = { "CELLULAR", ConnectionType::Cellular },
    ethernet = { "ethernet", ConnectionType::Ethernet },
    none = { "none", ConnectionType::None },
    bluetooth = { "bluetooth", ConnectionType::Unknown },
)]
fn connection_type_from_str(input: &str, expected: ConnectionType) {
    assert_eq!(input.parse::<ConnectionType>().unwrap(), expected);
}

#[test]
fn default_state_is_offline() {
    let state = ConnectivityState::default();
    assert!(!state.is_online);
    assert_eq!(state.connection_type, ConnectionType::Unknown);
    assert_eq!(state.last_online_at, None);
}

#[test]
fn apply_stamps_last_online_on_transition_only() {
    let offline = ConnectivityState::default();
    let online = offline.apply(&ConnectivityEvent::online(ConnectionType::Wifi), at(10));
    assert!(online.is_online);
    assert_eq!(online.last_online_at, Some(at(10)));

    // Staying online keeps the original timestamp
    let still = online.apply(&ConnectivityEvent::online(ConnectionType::Cellular), at(20));
    assert_eq!(still.last_online_at, Some(at(10)));
    assert_eq!(still.connection_type, ConnectionType::Cellular);

    // Going offline retains it too
    let gone = still.apply(&ConnectivityEvent::offline(), at(30));
    assert!(!gone.is_online);
    assert_eq!(gone.last_online_at, Some(at(10)));

    let back = gone.apply(&ConnectivityEvent::online(ConnectionType::Wifi), at(40));
    assert_eq!(back.last_online_at, Some(at(40)));
}

#[test]
fn apply_unknown_reachability_falls_back_to_link() {
    let event = ConnectivityEvent {
        connected: true,
        internet_reachable: None,
        connection_type: ConnectionType::Ethernet,
    };
    let state = ConnectivityState::default().apply(&event, at(1));
    assert!(state.is_internet_reachable);
}

#[test]
fn event_deserializes_platform_shape() {
    let event: ConnectivityEvent =
        serde_json::from_str(r#"{"connected":true,"internetReachable":null,"type":"cellular"}"#)
            .unwrap();
    assert!(event.connected);
    assert_eq!(event.internet_reachable, None);
    assert_eq!(event.connection_type, ConnectionType::Cellular);
}
