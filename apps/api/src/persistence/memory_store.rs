//! In-memory slot stores for tests.

use std::collections::HashMap;
use std::io::{Error, ErrorKind};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::persistence::{SlotStore, StoreError};

#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn with_slot(key: &str, value: &str) -> Self {
        Self {
            slots: Mutex::new(HashMap::from([(key.to_string(), value.to_string())])),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key).await)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.slots.lock().await.remove(key);
        Ok(())
    }
}

/// A store whose every operation fails, for exercising storage-fault recovery.
#[derive(Debug, Default)]
pub struct FailingSlotStore;

fn denied(key: &str) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        source: Error::new(ErrorKind::PermissionDenied, "denied"),
    }
}

#[async_trait]
impl SlotStore for FailingSlotStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Err(denied(key))
    }

    async fn write(&self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(denied(key))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        Err(denied(key))
    }
}
