//! Export client: hands snapshots to the local write-back service.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::document::schema::Document;
use crate::errors::service_error_message;

const SAVE_RESUME_PATH: &str = "/api/save-resume";
const SAVE_COVER_LETTER_PATH: &str = "/api/save-cover-letter";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Message used when the service fails without saying why.
pub const FALLBACK_MESSAGE: &str = "Failed to save";
/// Message used when the failure body is not JSON at all.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not reach export service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Service { status: u16, message: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveResumeRequest<'a> {
    resume_data: &'a Document,
}

#[derive(Serialize)]
struct SaveCoverLetterRequest<'a> {
    content: &'a str,
}

#[derive(Clone)]
pub struct ExportClient {
    client: Client,
    base_url: String,
}

impl ExportClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn save_resume(&self, document: &Document) -> Result<(), ExportError> {
        self.post(SAVE_RESUME_PATH, &SaveResumeRequest { resume_data: document })
            .await?;
        info!("Resume exported");
        Ok(())
    }

    pub async fn save_cover_letter(&self, content: &str) -> Result<(), ExportError> {
        self.post(SAVE_COVER_LETTER_PATH, &SaveCoverLetterRequest { content })
            .await?;
        info!("Cover letter exported ({} chars)", content.chars().count());
        Ok(())
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(), ExportError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(_) => service_error_message(&text).unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            Err(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
        };
        Err(ExportError::Service {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::sync::mpsc;

    use super::*;
    use crate::document::schema::default_document;
    use crate::test_support::spawn_stub;

    #[tokio::test]
    async fn test_save_resume_wraps_document() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
        let app = Router::new().route(
            SAVE_RESUME_PATH,
            post(move |Json(body): Json<Value>| async move {
                let _ = tx.send(body);
                Json(json!({ "ok": true }))
            }),
        );
        let exporter = ExportClient::new(spawn_stub(app).await).unwrap();

        let doc = default_document();
        exporter.save_resume(&doc).await.unwrap();

        let body = rx.recv().await.unwrap();
        assert_eq!(body["resumeData"], serde_json::to_value(&doc).unwrap());
    }

    #[tokio::test]
    async fn test_save_cover_letter_sends_content() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
        let app = Router::new().route(
            SAVE_COVER_LETTER_PATH,
            post(move |Json(body): Json<Value>| async move {
                let _ = tx.send(body);
                StatusCode::OK
            }),
        );
        let exporter = ExportClient::new(spawn_stub(app).await).unwrap();

        exporter.save_cover_letter("Dear team").await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), json!({ "content": "Dear team" }));
    }

    #[tokio::test]
    async fn test_failure_messages() {
        let app = Router::new()
            .route(
                SAVE_RESUME_PATH,
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "disk full" }))) }),
            )
            .route(
                SAVE_COVER_LETTER_PATH,
                post(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "detail": "x" }))) }),
            );
        let exporter = ExportClient::new(spawn_stub(app).await).unwrap();

        let err = exporter.save_resume(&default_document()).await.unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(matches!(err, ExportError::Service { status: 500, .. }));

        let err = exporter.save_cover_letter("x").await.unwrap_err();
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_non_json_failure_is_unknown_error() {
        let app = Router::new().route(
            SAVE_COVER_LETTER_PATH,
            post(|| async { (StatusCode::BAD_GATEWAY, "<html>proxy</html>") }),
        );
        let exporter = ExportClient::new(spawn_stub(app).await).unwrap();

        let err = exporter.save_cover_letter("x").await.unwrap_err();
        assert_eq!(err.to_string(), UNKNOWN_ERROR_MESSAGE);
    }
}
