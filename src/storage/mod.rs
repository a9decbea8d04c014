//! Local key-value persistence layer
//!
//! Stores JSON blobs under fixed string keys.
//! The in-memory store is the default; the file store persists across runs.

use crate::error::BankableError;
use crate::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Trait for key-value persistence
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store for tests and the demo binary
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one JSON file per key under a data directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed identifiers, not user input; separators are
        // replaced so a key can never escape the data directory.
        let safe: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BankableError::StorageError(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            BankableError::StorageError(format!(
                "failed to create {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self.path_for(key);
        debug!(key = %key, path = %path.display(), "Writing blob");

        tokio::fs::write(&path, value).await.map_err(|e| {
            BankableError::StorageError(format!("failed to write {}: {}", path.display(), e))
        })
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BankableError::StorageError(format!(
                "failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_roundtrip() {
        let store = InMemoryStore::new();

        assert!(store.get("missing").await.unwrap().is_none());

        store.set("k", "[1,2,3]".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("[1,2,3]".to_string()));

        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_missing_key() {
        let store = FileStore::new(std::env::temp_dir().join("bankable-test-empty"));
        assert!(store.get("nothing_here").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("bankable-test-{}", uuid::Uuid::new_v4()));
        let store = FileStore::new(&dir);

        store.set("goals", "{\"a\":1}".to_string()).await.unwrap();
        assert_eq!(
            store.get("goals").await.unwrap(),
            Some("{\"a\":1}".to_string())
        );

        store.remove("goals").await.unwrap();
        assert!(store.get("goals").await.unwrap().is_none());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
