// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use hs_core::{ActionId, ActionKind};

#[test]
fn test_error_action_not_found_display() {
    let err = Error::ActionNotFound("0190f3c4".to_string());
    let msg = err.to_string();
    assert!(msg.contains("action not found"));
    assert!(msg.contains("0190f3c4"));
    assert!(msg.contains("homestead list"));
}

#[test]
fn test_error_invalid_payload_display() {
    let err = Error::InvalidPayload("expected value at line 1".to_string());
    let msg = err.to_string();
    assert!(msg.contains("invalid payload"));
    assert!(msg.contains("{\"listingId\": 42}"));
}

#[test]
fn test_core_kind_error_maps_to_kind_variant() {
    let core_err = "bogus".parse::<ActionKind>().unwrap_err();
    let err: Error = core_err.into();
    assert!(matches!(err, Error::InvalidActionKind(ref s) if s == "bogus"));
    assert!(err.to_string().contains("valid kinds are"));
}

#[test]
fn test_core_id_error_maps_to_id_variant() {
    let core_err = "not-a-uuid".parse::<ActionId>().unwrap_err();
    let err: Error = core_err.into();
    assert!(matches!(err, Error::InvalidActionId(_)));
}

#[test]
fn test_drain_error_passes_message_through() {
    let err: Error = DrainError::Aborted("302 Found".to_string()).into();
    assert_eq!(err.to_string(), "sync aborted: 302 Found");
}

#[test]
fn test_store_error_display() {
    let err: Error = StoreError::Write {
        key: "offline_queue".to_string(),
        source: std::io::Error::other("disk full"),
    }
    .into();
    let msg = err.to_string();
    assert!(msg.contains("storage error"));
    assert!(msg.contains("offline_queue"));
    assert!(msg.contains("disk full"));
}

#[test]
fn test_config_error_display() {
    let err = Error::Config("bad key".to_string());
    assert_eq!(err.to_string(), "config error: bad key");
}
