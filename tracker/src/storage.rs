use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(String),
    #[error("Storage contents are corrupt: {0}")]
    Corrupt(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Corrupt(e.to_string())
    }
}

/// Durable key-value area private to the extension.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

#[async_trait]
impl<B: StorageBackend + ?Sized> StorageBackend for Arc<B> {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }
}

pub type SharedBackend = Arc<dyn StorageBackend>;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// The whole storage area as one JSON object on disk. Loaded on first use and
/// rewritten through a temporary file on every `set`.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    cache: Mutex<Option<Map<String, Value>>>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn loaded<'a>(
        &self,
        cache: &'a mut Option<Map<String, Value>>,
    ) -> Result<&'a mut Map<String, Value>, StorageError> {
        if cache.is_none() {
            let map = self.read_file().await?;
            info!("📂 Loaded {} stored keys from {}", map.len(), self.path.display());
            *cache = Some(map);
        }
        Ok(cache.get_or_insert_with(Map::new))
    }

    async fn read_file(&self) -> Result<Map<String, Value>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Map::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(map)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.path.with_extension("tmp");
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let mut cache = self.cache.lock().await;
        Ok(self.loaded(&mut cache).await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut cache = self.cache.lock().await;
        let map = self.loaded(&mut cache).await?;
        let previous = map.insert(key.to_string(), value);

        if let Err(e) = self.write_file(map).await {
            // memory must not run ahead of disk
            match previous {
                Some(old) => map.insert(key.to_string(), old),
                None => map.remove(key),
            };
            return Err(e);
        }
        debug!(key, "Persisted storage key");
        Ok(())
    }
}
