use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::document::schema::Document;
use crate::persistence::adapter::PersistenceAdapter;

enum WriteOp {
    Save(Box<Document>),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget snapshot writes, applied by one background task in submission order.
///
/// Callers never wait on storage; the in-memory Document is the read-after-write source
/// of truth. `flush` waits until everything submitted so far has been applied.
#[derive(Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriteOp>,
}

impl SnapshotWriter {
    /// Spawns the writer task. Must be called from within a tokio runtime.
    pub fn spawn(adapter: Arc<PersistenceAdapter>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(op) = rx.recv().await {
                match op {
                    WriteOp::Save(document) => adapter.save(&document).await,
                    WriteOp::Clear => adapter.clear().await,
                    WriteOp::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
            debug!("Snapshot writer stopped");
        });
        Self { tx }
    }

    pub fn save(&self, document: Document) {
        self.submit(WriteOp::Save(Box::new(document)));
    }

    pub fn clear(&self) {
        self.submit(WriteOp::Clear);
    }

    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(WriteOp::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    fn submit(&self, op: WriteOp) {
        if self.tx.send(op).is_err() {
            warn!("Snapshot writer is not running, dropping write");
        }
    }
}
