pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::draft::handlers as draft;
use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Draft API
        .route(
            "/api/v1/draft",
            get(draft::handle_get_draft).delete(draft::handle_clear),
        )
        .route("/api/v1/draft/fields", put(draft::handle_edit_fields))
        .route(
            "/api/v1/draft/sections/:group",
            post(draft::handle_add_entry),
        )
        .route(
            "/api/v1/draft/sections/:group/:position",
            delete(draft::handle_remove_entry),
        )
        .route(
            "/api/v1/draft/entries/:id",
            delete(draft::handle_remove_entry_by_id),
        )
        .route("/api/v1/draft/preview", get(draft::handle_draft_preview))
        .route("/api/v1/draft/save", post(draft::handle_save))
        .route("/api/v1/draft/load", post(draft::handle_load))
        .route("/api/v1/draft/generate", post(draft::handle_generate_draft))
        // Stateless API
        .route("/api/v1/preview", post(generation::handle_preview))
        .route("/api/v1/generate", post(generation::handle_generate))
        .with_state(state)
}
