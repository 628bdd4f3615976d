pub mod cover_letter;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::document::handlers as document;
use crate::export::handlers as export;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume document
        .route(
            "/api/v1/resume",
            get(document::handle_get_resume).put(document::handle_replace_resume),
        )
        .route("/api/v1/resume/actions", post(document::handle_dispatch))
        .route("/api/v1/resume/reset", post(document::handle_reset))
        .route("/api/v1/resume/sections", get(document::handle_list_sections))
        // Tailoring
        .route("/api/v1/resume/optimize", post(tailoring::handle_optimize))
        .route(
            "/api/v1/resume/tailoring",
            post(tailoring::handle_apply_tailoring),
        )
        // Cover letter
        .route(
            "/api/v1/cover-letter",
            get(cover_letter::handle_get_cover_letter)
                .put(cover_letter::handle_save_cover_letter)
                .delete(cover_letter::handle_clear_cover_letter),
        )
        // Export
        .route("/api/v1/resume/export", post(export::handle_export_resume))
        .route(
            "/api/v1/cover-letter/export",
            post(export::handle_export_cover_letter),
        )
        .with_state(state)
}
