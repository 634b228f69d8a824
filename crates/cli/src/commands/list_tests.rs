// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use hs_core::ActionKind;
use serde_json::json;

use super::*;
use crate::commands::testing::TestContext;

#[test]
fn test_format_action_line_fresh() {
    let action = QueuedAction::new(ActionKind::SaveListing, json!({}));
    let line = format_action_line(1, &action);

    assert!(line.starts_with("  1. "));
    assert!(line.contains(&action.id.to_string()));
    assert!(line.contains("save-listing"));
    assert!(!line.contains("failed attempt"));
    assert!(!line.contains("last error"));
}

#[test]
fn test_format_action_line_with_failures() {
    let mut action = QueuedAction::new(ActionKind::UpdateProfile, json!({}));
    action.record_failure("503 Service Unavailable");
    action.record_failure("503 Service Unavailable");
    let line = format_action_line(12, &action);

    assert!(line.starts_with(" 12. "));
    assert!(line.contains("2 failed attempt(s)"));
    assert!(line.contains("last error: 503 Service Unavailable"));
}

#[test]
fn test_format_failed_line() {
    let action = QueuedAction::new(ActionKind::CreateListingInquiry, json!({}));
    let entry = FailedAction::new(action.clone(), "422 Unprocessable Entity: closed");
    let line = format_failed_line(&entry);

    assert!(line.starts_with(&action.id.to_string()));
    assert!(line.contains("create-listing-inquiry"));
    assert!(line.ends_with(": 422 Unprocessable Entity: closed"));
}

#[tokio::test]
async fn test_list_and_failed_succeed_on_empty_store() {
    let t = TestContext::new();
    run(&t.ctx, OutputFormat::Text).await.unwrap();
    run(&t.ctx, OutputFormat::Json).await.unwrap();
    failed(&t.ctx, OutputFormat::Text).await.unwrap();
    failed(&t.ctx, OutputFormat::Json).await.unwrap();
}

#[tokio::test]
async fn test_list_reports_corrupt_store() {
    let t = TestContext::new();
    let path = t.dir.path().join("data").join("offline_queue.json");
    std::fs::write(&path, "[{not json").unwrap();

    let err = run(&t.ctx, OutputFormat::Text).await.unwrap_err();
    assert!(err.to_string().contains("corrupt"));
}
