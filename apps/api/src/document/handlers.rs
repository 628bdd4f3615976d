use axum::{extract::State, Json};

use crate::document::ordering::section_summaries;
use crate::document::reducer::Action;
use crate::document::schema::{Document, SectionSummary};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<Document> {
    Json(state.session.document().await)
}

/// PUT /api/v1/resume
pub async fn handle_replace_resume(
    State(state): State<AppState>,
    Json(document): Json<Document>,
) -> Result<Json<Document>, AppError> {
    let next = state
        .session
        .dispatch(Action::Replace {
            document: Box::new(document),
        })
        .await?;
    Ok(Json(next))
}

/// POST /api/v1/resume/actions
pub async fn handle_dispatch(
    State(state): State<AppState>,
    Json(action): Json<Action>,
) -> Result<Json<Document>, AppError> {
    Ok(Json(state.session.dispatch(action).await?))
}

/// POST /api/v1/resume/reset
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<Document>, AppError> {
    Ok(Json(state.session.dispatch(Action::Reset).await?))
}

/// GET /api/v1/resume/sections
pub async fn handle_list_sections(State(state): State<AppState>) -> Json<Vec<SectionSummary>> {
    Json(section_summaries(&state.session.document().await))
}
