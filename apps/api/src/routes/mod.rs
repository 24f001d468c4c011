pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::quiz::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/quiz", get(handlers::handle_get_quiz))
        // Single-page flow
        .route("/api/v1/readings", post(handlers::handle_create_reading))
        // Multi-page wizard flow
        .route(
            "/api/v1/wizard/advance",
            post(handlers::handle_wizard_advance),
        )
        .route("/api/v1/wizard/back", post(handlers::handle_wizard_back))
        .route(
            "/api/v1/wizard/reading",
            post(handlers::handle_wizard_reading),
        )
        .with_state(state)
}
