//! Route modules for the report server

pub mod health;
pub mod reports;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::state::AppState;

/// All endpoints with the configured body limit applied
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().server.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .merge(reports::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
