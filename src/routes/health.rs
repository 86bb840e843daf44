//! Health check endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub arabic_font: &'static str,
    pub version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Server is running!",
        arabic_font: state.reports().fonts().status_label(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
