use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

use crate::error::KvError;

/// Durable string-to-string storage that the movie store and preferences sit on
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key has never been written
    async fn get_item(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Write a value, replacing any previous one
    async fn set_item(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Remove a key; removing a missing key is not an error
    async fn remove_item(&self, key: &str) -> Result<(), KvError>;
}

/// One file per key inside a storage directory
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn item_path(&self, key: &str) -> Result<PathBuf, KvError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if !valid {
            return Err(KvError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> KvError + '_ {
    move |source| KvError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        let path = self.item_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => {
                debug!("Storage read: {} ({} bytes)", key, value.len());
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Storage miss: {} (file does not exist)", key);
                Ok(None)
            }
            Err(e) => Err(io_error(key)(e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), KvError> {
        let path = self.item_path(key)?;
        tokio::fs::create_dir_all(&self.root).await.map_err(io_error(key))?;

        // Atomic write: write to a hidden temp file, then rename over the key
        let temp_path = self.root.join(format!(".{}.tmp", key));
        tokio::fs::write(&temp_path, value).await.map_err(io_error(key))?;
        tokio::fs::rename(&temp_path, &path).await.map_err(io_error(key))?;

        debug!("Storage write: {} ({} bytes)", key, value.len());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), KvError> {
        let path = self.item_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Storage remove: {}", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key)(e)),
        }
    }
}

/// Process-local storage, for embedding and tests
#[derive(Default)]
pub struct MemoryKeyValueStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.items().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.items().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), KvError> {
        self.items().remove(key);
        Ok(())
    }
}
