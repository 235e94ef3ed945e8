//! Recorded-state storage.
//!
//! The store is the orchestration framework's side of a pass: it hands out
//! the last known state and accepts the new one. Implementations must be
//! thread-safe; distinct keys are reconciled independently.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::state::AlertResponderState;

/// Errors raised by a [`StateStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error for {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid state key: {0}")]
    InvalidKey(String),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current recorded state, `None` if nothing is recorded for `key`.
    async fn get(&self, key: &str) -> Result<Option<AlertResponderState>, StoreError>;

    /// Replace the recorded state for `key`.
    async fn set(&self, key: &str, state: &AlertResponderState) -> Result<(), StoreError>;

    /// Forget `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub type DynStateStore = Arc<dyn StateStore>;

/// In-process store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: DashMap<String, AlertResponderState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<AlertResponderState>, StoreError> {
        Ok(self.states.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, state: &AlertResponderState) -> Result<(), StoreError> {
        self.states.insert(key.to_string(), state.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.states.remove(key);
        Ok(())
    }
}

/// One pretty-printed JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, key: &str) -> Result<Option<AlertResponderState>, StoreError> {
        let path = self.path_for(key)?;
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        let state = serde_json::from_slice(&content).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(state))
    }

    async fn set(&self, key: &str, state: &AlertResponderState) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let content =
            serde_json::to_vec_pretty(state).map_err(|source| StoreError::Serialization {
                key: key.to_string(),
                source,
            })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;

        // Readers only ever see a complete record.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        tracing::debug!(key, path = %path.display(), "Recorded state written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }
}
