use axum::{extract::State, http::StatusCode};

use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/resume/export
pub async fn handle_export_resume(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let document = state.session.document().await;
    state.exporter.save_resume(&document).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/cover-letter/export
pub async fn handle_export_cover_letter(
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let content = state.cover_letter.load().await;
    state.exporter.save_cover_letter(&content).await?;
    Ok(StatusCode::NO_CONTENT)
}
