//! Editor session: owns the authoritative in-memory Document.
//!
//! Every change goes through the reducer; each accepted result replaces the Document in
//! one write-locked step and is handed to the snapshot writer. Readers never observe a
//! half-applied change.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::document::reducer::{self, Action};
use crate::document::schema::Document;
use crate::document::DocumentError;
use crate::persistence::adapter::PersistenceAdapter;
use crate::persistence::writer::SnapshotWriter;
use crate::tailoring::merge::merge_tailoring;
use crate::tailoring::payload::TailoringPayload;

pub struct EditorSession {
    document: RwLock<Document>,
    writer: SnapshotWriter,
}

impl EditorSession {
    /// Loads the persisted Document (or the default) and starts the snapshot writer.
    pub async fn open(adapter: Arc<PersistenceAdapter>) -> Self {
        let document = adapter.load().await;
        Self {
            document: RwLock::new(document),
            writer: SnapshotWriter::spawn(adapter),
        }
    }

    /// A snapshot of the current Document.
    pub async fn document(&self) -> Document {
        self.document.read().await.clone()
    }

    /// Applies one reducer action. On error the Document is unchanged.
    pub async fn dispatch(&self, action: Action) -> Result<Document, DocumentError> {
        let is_reset = matches!(action, Action::Reset);
        let mut current = self.document.write().await;
        let next = reducer::apply(&current, action)?;
        *current = next.clone();
        if is_reset {
            self.writer.clear();
        } else {
            self.writer.save(next.clone());
        }
        Ok(next)
    }

    /// Merges a successful tailoring payload into the current Document.
    ///
    /// The payload may have been requested against an older snapshot; it is merged into
    /// whatever the Document is now. Unknown ids are ignored.
    pub async fn apply_tailoring(&self, payload: &TailoringPayload) -> Document {
        let mut current = self.document.write().await;
        let next = merge_tailoring(&current, payload);
        *current = next.clone();
        self.writer.save(next.clone());
        info!("Tailoring suggestions applied");
        next
    }

    /// Waits for all submitted snapshot writes to land.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::schema::{default_document, SectionKind};
    use crate::persistence::memory_store::MemorySlotStore;
    use crate::persistence::RESUME_SLOT;
    use serde_json::json;

    async fn open_session() -> (EditorSession, Arc<PersistenceAdapter>, Arc<MemorySlotStore>) {
        let store = Arc::new(MemorySlotStore::default());
        let adapter = Arc::new(PersistenceAdapter::new(store.clone()));
        (EditorSession::open(adapter.clone()).await, adapter, store)
    }

    #[tokio::test]
    async fn test_dispatch_updates_and_persists() {
        let (session, adapter, _) = open_session().await;
        let next = session
            .dispatch(Action::ToggleEnabled {
                section_id: SectionKind::Skills,
            })
            .await
            .unwrap();
        assert!(!next.skills.enabled);
        assert_eq!(session.document().await, next);

        session.flush().await;
        assert_eq!(adapter.load().await, next, "persisted snapshot equals in-memory document");
    }

    #[tokio::test]
    async fn test_failed_dispatch_leaves_document_unchanged() {
        let (session, _, store) = open_session().await;
        let before = session.document().await;
        let err = session
            .dispatch(Action::ReorderSections {
                from_index: 0,
                to_index: 99,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::IndexOutOfRange { .. }));
        assert_eq!(session.document().await, before);

        session.flush().await;
        assert_eq!(store.get(RESUME_SLOT).await, None, "nothing written on failure");
    }

    #[tokio::test]
    async fn test_reset_clears_slot() {
        let (session, _, store) = open_session().await;
        session
            .dispatch(Action::ToggleEnabled {
                section_id: SectionKind::Other,
            })
            .await
            .unwrap();
        let doc = session.dispatch(Action::Reset).await.unwrap();
        assert_eq!(doc, default_document());

        session.flush().await;
        assert_eq!(store.get(RESUME_SLOT).await, None);
    }

    #[tokio::test]
    async fn test_session_reopens_persisted_document() {
        let (session, adapter, _) = open_session().await;
        let edited = session
            .dispatch(Action::ReorderSections {
                from_index: 1,
                to_index: 4,
            })
            .await
            .unwrap();
        session.flush().await;

        let reopened = EditorSession::open(adapter).await;
        assert_eq!(reopened.document().await, edited);
    }

    #[tokio::test]
    async fn test_tailoring_merges_into_current_document() {
        let (session, adapter, _) = open_session().await;
        let snapshot = session.document().await;

        // An edit lands while the tailoring request is outstanding
        session
            .dispatch(Action::ToggleEnabled {
                section_id: SectionKind::Education,
            })
            .await
            .unwrap();

        let payload: TailoringPayload =
            serde_json::from_value(json!({ "missingSkills": ["go"], "companyName": "Acme" })).unwrap();
        let merged = session.apply_tailoring(&payload).await;

        assert!(!merged.education.enabled, "concurrent edit is kept");
        assert_eq!(merged.skills.data.len(), snapshot.skills.data.len() + 1);

        session.flush().await;
        assert_eq!(adapter.load().await, merged);
    }
}
