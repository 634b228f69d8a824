// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// A temp dir holding a config file whose queue lives under `data/`.
pub struct Env {
    pub temp: TempDir,
    pub config: PathBuf,
}

impl Env {
    /// API base URL points at a closed local port, so nothing is ever sent.
    pub fn new() -> Self {
        Self::with_remote("http://127.0.0.1:9/api")
    }

    pub fn with_remote(base_url: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        let data_dir = temp.path().join("data");
        std::fs::write(
            &config,
            format!(
                "[remote]\nbase_url = \"{}\"\ntimeout_ms = 2000\n\n[queue]\ndata_dir = \"{}\"\nreplay_timeout_ms = 2000\n",
                base_url,
                data_dir.display().to_string().replace('\\', "\\\\")
            ),
        )
        .unwrap();
        Env { temp, config }
    }

    /// `homestead --config <config>`
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("homestead");
        cmd.arg("--config").arg(&self.config).env_remove("RUST_LOG");
        cmd
    }

    /// Enqueue an action and return its id.
    pub fn enqueue(&self, kind: &str, payload: &str) -> String {
        let output = self
            .cmd()
            .args(["enqueue", kind, "--payload", payload, "-o", "json"])
            .output()
            .unwrap();
        assert!(output.status.success(), "enqueue failed: {:?}", output);
        let action: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        action["id"].as_str().unwrap().to_string()
    }
}
