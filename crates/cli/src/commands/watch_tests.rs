// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use hs_core::SyncStatus;
use yare::parameterized;

use super::*;

#[parameterized(
    offline_idle = { false, SyncStatus::Idle, 2, "offline sync=idle    pending=2" },
    online_syncing = { true, SyncStatus::Syncing, 1, "online  sync=syncing pending=1" },
    online_error = { true, SyncStatus::Error, 0, "online  sync=error   pending=0" },
)]
fn test_format_view(online: bool, status: SyncStatus, pending: usize, expected: &str) {
    let view = SyncView::new(online, status, pending);
    assert_eq!(format_view(&view), expected);
}
