use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::document::schema::Document;
use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::payload::TailoringPayload;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(default)]
    pub job_text: String,
}

#[derive(Serialize)]
pub struct OptimizeResponse {
    pub document: Document,
    /// The normalised payload, including the presentation-only fields.
    pub suggestions: TailoringPayload,
}

/// POST /api/v1/resume/optimize
///
/// The session lock is not held while the service call is outstanding; the payload is
/// merged into whatever the Document is once it arrives. On failure nothing is merged.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    if req.job_text.trim().is_empty() {
        return Err(AppError::Validation("jobText must not be empty".to_string()));
    }

    let snapshot = state.session.document().await;
    let suggestions = state.tailoring.optimize(&req.job_text, &snapshot).await?;
    let document = state.session.apply_tailoring(&suggestions).await;

    Ok(Json(OptimizeResponse {
        document,
        suggestions,
    }))
}

/// POST /api/v1/resume/tailoring
pub async fn handle_apply_tailoring(
    State(state): State<AppState>,
    Json(payload): Json<TailoringPayload>,
) -> Json<Document> {
    Json(state.session.apply_tailoring(&payload).await)
}
