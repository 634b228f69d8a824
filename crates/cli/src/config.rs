// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from `config.toml` under the user config directory
//! (or the path given with `--config`). Every key is optional:
//! - `[remote]`: API base URL, auth token, request timeout, route overrides
//! - `[queue]`: where the queue is stored and how failures are retried
//! - `[network]`: reachability probe and transition debounce

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::DEFAULT_QUEUE_KEY;
use crate::sync::{MonitorConfig, QueueConfig};

const APP_DIR_NAME: &str = "homestead";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub queue: QueueSettings,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Listings API the queue replays against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL every route path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every replay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Per-request timeout in milliseconds (default: 15000).
    #[serde(default = "default_request_timeout_ms")]
    pub timeout_ms: u64,
    /// Route overrides keyed by action kind, e.g.
    /// `save-listing = "PUT /favorites"`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub routes: BTreeMap<String, String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            base_url: default_base_url(),
            auth_token: None,
            timeout_ms: default_request_timeout_ms(),
            routes: BTreeMap::new(),
        }
    }
}

/// Queue storage and retry policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSettings {
    /// Directory holding the queue files. Defaults to the user data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Storage key of the queue (default: "offline_queue").
    #[serde(default = "default_queue_key")]
    pub key: String,
    /// Retryable failures allowed per action. 0 = unlimited.
    #[serde(default)]
    pub max_attempts: u32,
    /// Keep rejected actions in the failed list instead of dropping them.
    #[serde(default = "default_true")]
    pub keep_failed: bool,
    /// Upper bound on one replay in milliseconds (default: 30000).
    #[serde(default = "default_replay_timeout_ms")]
    pub replay_timeout_ms: u64,
}

impl Default for QueueSettings {
    fn default() -> Self {
        QueueSettings {
            data_dir: None,
            key: default_queue_key(),
            max_attempts: 0,
            keep_failed: true,
            replay_timeout_ms: default_replay_timeout_ms(),
        }
    }
}

/// Connectivity detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// `host:port` probed for reachability. Derived from `remote.base_url`
    /// when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_addr: Option<String>,
    /// Delay between probes in milliseconds (default: 5000).
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
    /// Connect timeout for one probe in milliseconds (default: 2000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// How long a flip must hold before it counts, in milliseconds. 0 = off.
    #[serde(default)]
    pub debounce_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            probe_addr: None,
            probe_interval_ms: default_probe_interval_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            debounce_ms: 0,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

fn default_queue_key() -> String {
    DEFAULT_QUEUE_KEY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_replay_timeout_ms() -> u64 {
    30_000
}

fn default_probe_interval_ms() -> u64 {
    5_000
}

fn default_probe_timeout_ms() -> u64 {
    2_000
}

impl Config {
    /// Loads configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding the queue files.
    pub fn data_dir(&self) -> PathBuf {
        match &self.queue.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir(),
        }
    }

    /// Address probed for reachability.
    pub fn probe_addr(&self) -> Result<String> {
        if let Some(addr) = &self.network.probe_addr {
            return Ok(addr.clone());
        }
        let url = reqwest::Url::parse(&self.remote.base_url).map_err(|e| {
            Error::Config(format!("invalid base_url '{}': {}", self.remote.base_url, e))
        })?;
        let (Some(host), Some(port)) = (url.host_str(), url.port_or_known_default()) else {
            return Err(Error::Config(format!(
                "cannot derive probe address from base_url '{}'",
                self.remote.base_url
            )));
        };
        Ok(format!("{}:{}", host, port))
    }

    /// Queue service tunables.
    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            replay_timeout: Duration::from_millis(self.queue.replay_timeout_ms),
            max_attempts: self.queue.max_attempts,
            keep_failed: self.queue.keep_failed,
        }
    }

    /// Monitor tunables.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            debounce: Duration::from_millis(self.network.debounce_ms),
        }
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.network.probe_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.network.probe_timeout_ms)
    }
}

/// Default config file location (`<config dir>/homestead/config.toml`).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Default queue directory (`<local data dir>/homestead`).
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
