// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use super::*;
use yare::parameterized;

#[test]
fn test_enqueue_with_payload() {
    let cli = Cli::try_parse_from([
        "homestead",
        "enqueue",
        "save-listing",
        "-p",
        r#"{"listingId": 42}"#,
    ])
    .unwrap();

    match cli.command {
        Command::Enqueue {
            kind,
            payload,
            output,
        } => {
            assert_eq!(kind, "save-listing");
            assert_eq!(payload.as_deref(), Some(r#"{"listingId": 42}"#));
            assert_eq!(output, OutputFormat::Text);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_enqueue_rejects_empty_kind() {
    assert!(Cli::try_parse_from(["homestead", "enqueue", "  "]).is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "homestead",
        "list",
        "--config",
        "/tmp/hs.toml",
        "-v",
        "-o",
        "json",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/hs.toml")));
    assert!(matches!(
        cli.command,
        Command::List {
            output: OutputFormat::Json
        }
    ));
}

#[parameterized(
    sync = { &["homestead", "sync"] },
    watch = { &["homestead", "watch"] },
    clear_failed = { &["homestead", "clear-failed"] },
    retry = { &["homestead", "retry", "0190"] },
    remove = { &["homestead", "remove", "0190"] },
    status = { &["homestead", "status", "0190"] },
    failed = { &["homestead", "failed", "--output", "json"] },
    send = { &["homestead", "send", "unsave-listing"] },
)]
fn test_subcommands_parse(args: &[&str]) {
    let cli = Cli::try_parse_from(args).unwrap();
    assert!(!cli.verbose);
    assert_eq!(cli.config, None);
}

#[parameterized(
    retry_without_id = { &["homestead", "retry"] },
    unknown_command = { &["homestead", "flush"] },
    bad_output = { &["homestead", "list", "-o", "yaml"] },
)]
fn test_invalid_invocations(args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}
