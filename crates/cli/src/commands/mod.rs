// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod enqueue;
pub mod list;
pub mod manage;
pub mod sync;
pub mod watch;

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::sync::Arc;

use hs_core::ActionId;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::{FileStore, QueueStore};
use crate::sync::{HttpRemote, OfflineQueue, Remote};

/// Shortest id prefix accepted in place of a full action id.
const MIN_ID_PREFIX: usize = 4;

/// Everything a command needs: configuration and the queue service.
pub struct Context {
    pub config: Config,
    pub queue: OfflineQueue,
}

impl Context {
    /// Open the on-disk queue and the HTTP remote described by `config`.
    pub fn open(config: Config) -> Result<Self> {
        let remote = HttpRemote::new(&config.remote)?;
        Self::with_remote(config, Arc::new(remote))
    }

    /// Open the on-disk queue with a caller-supplied remote.
    pub fn with_remote(config: Config, remote: Arc<dyn Remote>) -> Result<Self> {
        let data_dir = config.data_dir();
        let kv = FileStore::open(&data_dir).map_err(|e| {
            Error::Config(format!(
                "cannot open data dir {}: {}",
                data_dir.display(),
                e
            ))
        })?;
        tracing::debug!(data_dir = %data_dir.display(), key = %config.queue.key, "opened queue store");

        let store = QueueStore::with_key(Arc::new(kv), config.queue.key.clone());
        let queue = OfflineQueue::new(store, remote, config.queue_config());
        Ok(Context { config, queue })
    }

    /// Resolve a full or partial action id against pending and failed actions.
    pub async fn resolve_id(&self, input: &str) -> Result<ActionId> {
        let input = input.trim();
        if let Ok(id) = input.parse::<ActionId>() {
            return Ok(id);
        }
        if input.len() < MIN_ID_PREFIX {
            return Err(Error::ActionNotFound(input.to_string()));
        }

        let needle = input.to_lowercase();
        let mut matches: Vec<ActionId> = self
            .queue
            .get_queue()
            .await?
            .iter()
            .map(|a| a.id)
            .chain(self.queue.failed().await?.iter().map(|f| f.action.id))
            .filter(|id| id.to_string().starts_with(&needle))
            .collect();
        matches.sort();
        matches.dedup();

        match matches.as_slice() {
            [] => Err(Error::ActionNotFound(input.to_string())),
            [id] => Ok(*id),
            _ => Err(Error::AmbiguousId {
                prefix: input.to_string(),
                matches: matches.iter().map(ToString::to_string).collect(),
            }),
        }
    }
}

/// Parse a `--payload` argument. Absent means an empty object.
pub(crate) fn parse_payload(input: Option<&str>) -> Result<serde_json::Value> {
    match input {
        None => Ok(serde_json::Value::Object(serde_json::Map::new())),
        Some(text) => {
            serde_json::from_str(text).map_err(|e| Error::InvalidPayload(e.to_string()))
        }
    }
}
