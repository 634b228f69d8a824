// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value persistence backends.
//!
//! Provides a trait-based storage layer that enables:
//! - File-backed storage that survives process restarts and is shared
//!   safely between processes through an advisory lock file
//! - In-memory storage with failure injection for unit testing

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::AsyncWriteExt;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading a key failed.
    #[error("failed to read '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Writing a key failed. The caller's data was not persisted.
    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The stored value could not be decoded.
    #[error("corrupt data under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The exclusive lock for a key could not be taken.
    #[error("failed to lock '{key}': {source}")]
    Lock {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The value could not be encoded.
    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Guard returned by [`KeyValueStore::lock`]. Dropping it releases the lock.
#[derive(Debug, Default)]
pub struct StoreLock {
    _file: Option<File>,
}

/// Generic string key-value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get_item<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<Option<String>>> + Send + 'a>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item<'a>(
        &'a self,
        key: &'a str,
        value: String,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>>;

    /// Delete `key`. Removing an absent key succeeds.
    fn remove_item<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>>;

    /// Exclude other writers of `key` until the guard is dropped.
    ///
    /// Backends visible to other processes must block them here. The
    /// default only suits storage private to one service instance.
    fn lock<'a>(
        &'a self,
        _key: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<StoreLock>> + Send + 'a>> {
        Box::pin(async { Ok(StoreLock::default()) })
    }
}

/// File-backed store: one file per key under a directory.
///
/// Writes go to a temporary sibling file which is fsynced and then renamed
/// over the target, so a crash leaves either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    /// Directory holding the key files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name.trim_start_matches('.')))
    }

    /// Path of the lock file guarding `key`.
    pub fn lock_path_for(&self, key: &str) -> PathBuf {
        self.path_for(key).with_extension("lock")
    }
}

/// Block until an exclusive lock on `path` is held.
fn acquire_lock(path: &Path) -> io::Result<File> {
    use fs2::FileExt;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    file.lock_exclusive()?;
    Ok(file)
}

impl KeyValueStore for FileStore {
    fn get_item<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<Option<String>>> + Send + 'a>> {
        let path = self.path_for(key);
        Box::pin(async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => Ok(Some(content)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(StoreError::Read {
                    key: key.to_string(),
                    source: e,
                }),
            }
        })
    }

    fn set_item<'a>(
        &'a self,
        key: &'a str,
        value: String,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>> {
        let path = self.path_for(key);
        Box::pin(async move {
            let write = async {
                let tmp = path.with_extension("json.tmp");
                let mut file = tokio::fs::File::create(&tmp).await?;
                file.write_all(value.as_bytes()).await?;
                file.sync_all().await?;
                drop(file);
                tokio::fs::rename(&tmp, &path).await
            };
            write.await.map_err(|e| StoreError::Write {
                key: key.to_string(),
                source: e,
            })
        })
    }

    fn remove_item<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>> {
        let path = self.path_for(key);
        Box::pin(async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StoreError::Write {
                    key: key.to_string(),
                    source: e,
                }),
            }
        })
    }

    fn lock<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<StoreLock>> + Send + 'a>> {
        let path = self.lock_path_for(key);
        Box::pin(async move {
            let file = tokio::task::spawn_blocking(move || acquire_lock(&path))
                .await
                .map_err(io::Error::other)
                .and_then(|locked| locked)
                .map_err(|e| StoreError::Lock {
                    key: key.to_string(),
                    source: e,
                })?;
            Ok(StoreLock { _file: Some(file) })
        })
    }
}

/// In-memory store. Clones share the same map, so a clone handed to a new
/// service instance behaves like the same device storage after a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<HashMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Release);
    }

    /// Make subsequent writes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    /// Raw value under `key`, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Overwrite the raw value under `key`, bypassing failure injection.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
    }

    fn injected(key: &str, write: bool) -> StoreError {
        let source = io::Error::other("injected failure");
        let key = key.to_string();
        if write {
            StoreError::Write { key, source }
        } else {
            StoreError::Read { key, source }
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<Option<String>>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail_reads.load(Ordering::Acquire) {
                return Err(Self::injected(key, false));
            }
            Ok(self.raw(key))
        })
    }

    fn set_item<'a>(
        &'a self,
        key: &'a str,
        value: String,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::Acquire) {
                return Err(Self::injected(key, true));
            }
            self.put_raw(key, value);
            Ok(())
        })
    }

    fn remove_item<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = StoreResult<()>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::Acquire) {
                return Err(Self::injected(key, true));
            }
            self.items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(key);
            Ok(())
        })
    }
}
