//! Maintenance Request Report Server
//!
//! Two small pieces of glue around a maintenance-request web application:
//!
//! - `report` + `routes`: an HTTP service that renders request records into
//!   PDF documents (a single-record detail sheet and a paginated table)
//! - `auth`: the gate that decides whether a dashboard page may render and
//!   keeps cached profile fields in sync with the identity provider
//!
//! # Modules
//!
//! - `request`: loosely-typed request records, statuses, dates
//! - `report`: page layout and PDF rendering
//! - `routes`: axum handlers
//! - `auth`: session context, provider traits, gate state machine

pub mod auth;
pub mod config;
pub mod error;
pub mod report;
pub mod request;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Full application router with CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
