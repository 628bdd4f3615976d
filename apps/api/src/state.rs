use std::sync::Arc;

use crate::export::client::ExportClient;
use crate::persistence::adapter::CoverLetterStore;
use crate::session::EditorSession;
use crate::tailoring::client::TailoringClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<EditorSession>,
    pub cover_letter: Arc<CoverLetterStore>,
    pub tailoring: TailoringClient,
    pub exporter: ExportClient,
}

#[cfg(test)]
impl AppState {
    /// In-memory state whose collaborators live at `service_url`.
    pub async fn for_tests(service_url: &str) -> Self {
        use crate::persistence::adapter::PersistenceAdapter;
        use crate::persistence::memory_store::MemorySlotStore;
        use std::time::Duration;

        let store = Arc::new(MemorySlotStore::default());
        let adapter = Arc::new(PersistenceAdapter::new(store.clone()));
        Self {
            session: Arc::new(EditorSession::open(adapter).await),
            cover_letter: Arc::new(CoverLetterStore::new(store)),
            tailoring: TailoringClient::new(service_url)
                .unwrap()
                .with_retry_base_delay(Duration::from_millis(5)),
            exporter: ExportClient::new(service_url).unwrap(),
        }
    }
}
