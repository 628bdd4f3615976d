use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Serialize, Deserialize)]
pub struct CoverLetter {
    pub content: String,
}

/// GET /api/v1/cover-letter
pub async fn handle_get_cover_letter(State(state): State<AppState>) -> Json<CoverLetter> {
    Json(CoverLetter {
        content: state.cover_letter.load().await,
    })
}

/// PUT /api/v1/cover-letter
pub async fn handle_save_cover_letter(
    State(state): State<AppState>,
    Json(letter): Json<CoverLetter>,
) -> Json<CoverLetter> {
    state.cover_letter.save(&letter.content).await;
    Json(letter)
}

/// DELETE /api/v1/cover-letter
pub async fn handle_clear_cover_letter(State(state): State<AppState>) -> StatusCode {
    state.cover_letter.clear().await;
    StatusCode::NO_CONTENT
}
