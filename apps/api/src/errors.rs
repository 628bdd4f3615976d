use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::document::DocumentError;
use crate::export::client::ExportError;
use crate::tailoring::client::TailoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Tailoring failed: {0}")]
    Tailoring(#[from] TailoringError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Document(e) => match e {
                DocumentError::UnknownSection(_) | DocumentError::ItemNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string())
                }
                _ => (StatusCode::BAD_REQUEST, "DOCUMENT_ERROR", e.to_string()),
            },
            AppError::Tailoring(e) => {
                tracing::error!("Tailoring error: {e}");
                (StatusCode::BAD_GATEWAY, "TAILORING_ERROR", e.to_string())
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (StatusCode::BAD_GATEWAY, "EXPORT_ERROR", e.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[derive(Deserialize)]
struct ServiceErrorBody {
    error: String,
}

/// Extracts `error` from a collaborator's `{ "error": string }` failure body.
pub fn service_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|message| !message.trim().is_empty())
}
