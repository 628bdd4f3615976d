use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::persistence::{SlotStore, StoreError};

/// Stores each slot as one file under a data directory.
///
/// Writes go to a sibling temp file and are renamed into place, so a crash mid-write
/// leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    root: PathBuf,
}

impl FileSlotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        info!("Snapshot slots stored under {}", root.display());
        Self { root }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.slot"))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl SlotStore for FileSlotStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.slot_path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(key, e))?;

        let path = self.slot_path(key);
        let tmp = self.root.join(format!("{key}.slot.tmp"));
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(key, e))?;

        debug!("Wrote {} bytes to slot '{key}'", value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.slot_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_slot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path());
        assert_eq!(store.read("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path());
        store.write("slot", "first").await.unwrap();
        store.write("slot", "second").await.unwrap();
        assert_eq!(store.read("slot").await.unwrap().as_deref(), Some("second"));
        assert!(!dir.path().join("slot.slot.tmp").exists(), "temp file must be renamed away");
    }

    #[tokio::test]
    async fn test_write_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path().join("nested").join("data"));
        store.write("slot", "value").await.unwrap();
        assert_eq!(store.read("slot").await.unwrap().as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path());
        store.write("slot", "value").await.unwrap();
        store.remove("slot").await.unwrap();
        store.remove("slot").await.unwrap();
        assert_eq!(store.read("slot").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSlotStore::new(dir.path());
        store.write("a", "1").await.unwrap();
        store.write("b", "2").await.unwrap();
        store.remove("a").await.unwrap();
        assert_eq!(store.read("b").await.unwrap().as_deref(), Some("2"));
    }
}
