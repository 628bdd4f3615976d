// Durable snapshot slots for the resume document and the cover letter.
// One named slot per document; values are whole snapshots, last write wins.

pub mod adapter;
pub mod file_store;
pub mod writer;

#[cfg(test)]
pub mod memory_store;

use async_trait::async_trait;
use thiserror::Error;

/// Slot holding the JSON-serialized resume Document.
pub const RESUME_SLOT: &str = "dynamic-resume-data";
/// Slot holding the raw cover-letter text.
pub const COVER_LETTER_SLOT: &str = "cover-letter-content";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on slot '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Single-value key/value storage. Implementations overwrite whole values.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Returns `None` when the slot has never been written (or was removed).
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing an absent slot is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
