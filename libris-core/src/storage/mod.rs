//! Key-value persistence for the session

use crate::error::StorageError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Abstract string key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;
}

type Entries = BTreeMap<String, String>;

/// Store backed by a single JSON object on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at the given file path. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StorageResult<Entries> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) if data.trim().is_empty() => Ok(Entries::new()),
            Ok(data) => serde_json::from_str(&data)
                .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a temp file in the same directory, then rename over the original
    async fn save(&self, entries: &Entries) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}

/// In-memory store (for testing)
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Entries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.data.write().remove(key);
        Ok(())
    }
}
