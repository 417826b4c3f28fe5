pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::state::AppState;
use crate::workflow::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/workflow", get(handlers::handle_get_workflow))
        .route(
            "/api/v1/workflow/activate",
            post(handlers::handle_activate),
        )
        .route("/api/v1/workflow/form", patch(handlers::handle_update_form))
        .route("/api/v1/workflow/submit", post(handlers::handle_submit))
        .route("/api/v1/workflow/output", put(handlers::handle_edit_output))
        .route(
            "/api/v1/workflow/export/:kind",
            post(handlers::handle_export),
        )
        .route(
            "/api/v1/workflow/clipboard",
            get(handlers::handle_get_clipboard),
        )
        .route(
            "/api/v1/workflow/errors/:domain",
            delete(handlers::handle_dismiss_error),
        )
        .with_state(state)
}
