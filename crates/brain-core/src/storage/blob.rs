//! Opaque key-value blob stores that hold snapshots.
//!
//! The engine only ever uses a couple of constant keys. Each `put` must be
//! atomic on its own: a concurrent `get` sees the old bytes or the new bytes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{BrainError, Result};

/// Async single-slot-per-key storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the bytes stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `key`.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local blob store.
///
/// Clones share the same slots, which lets tests drop a `Store` and reopen a
/// new one over the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    slots: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_slots(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.slots
            .lock()
            .map_err(|_| BrainError::BlobStore("Memory blob store poisoned".to_string()))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock_slots()?.get(key).cloned())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.lock_slots()?.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock_slots()?.remove(key);
        Ok(())
    }
}

/// Directory-backed blob store: one file per key.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Use `dir` for blobs, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            BrainError::BlobStore(format!(
                "Failed to create blob directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    /// File path for `key`. Keys are restricted to a filename-safe alphabet.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(BrainError::InvalidInput(format!("Invalid blob key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.bin", key)))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(BrainError::BlobStore(format!(
                "Failed to read {}: {}",
                path.display(),
                err
            ))),
        }
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let path = self.path_for(key)?;
        let target = path.clone();
        tokio::task::spawn_blocking(move || crate::fs::write_atomic(&target, &bytes))
            .await
            .map_err(|e| BrainError::BlobStore(format!("Blob write task failed: {}", e)))?
            .map_err(|e| {
                BrainError::BlobStore(format!("Failed to write {}: {}", path.display(), e))
            })
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(BrainError::BlobStore(format!(
                "Failed to remove {}: {}",
                path.display(),
                err
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_store_clones_share_slots() {
        let store = MemoryBlobStore::new();
        let other = store.clone();
        store.put("db", vec![1, 2, 3]).await.unwrap();
        assert_eq!(other.get("db").await.unwrap(), Some(vec![1, 2, 3]));
        other.remove("db").await.unwrap();
        assert_eq!(store.get("db").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_round_trip_and_missing_key() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::open(dir.path().join("blobs")).unwrap();

        assert_eq!(store.get("db").await.unwrap(), None);
        store.put("db", b"image".to_vec()).await.unwrap();
        store.put("db", b"newer image".to_vec()).await.unwrap();
        assert_eq!(store.get("db").await.unwrap(), Some(b"newer image".to_vec()));

        store.remove("db").await.unwrap();
        store.remove("db").await.unwrap();
        assert_eq!(store.get("db").await.unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::open(dir.path()).unwrap();
        assert!(store.path_for("../etc/passwd").is_err());
        assert!(store.path_for("").is_err());
        assert!(store.path_for("appState").is_ok());
    }
}
