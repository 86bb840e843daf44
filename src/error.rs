//! Error types for the report server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::report::ReportError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("HTTP error: {0}")]
    Http(#[from] axum::http::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Report(e) => {
                tracing::error!("Report generation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate PDF".to_string(),
                )
            }
            AppError::Http(e) => {
                tracing::error!("Failed to build response: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let details = match (&self, cfg!(debug_assertions)) {
            (AppError::BadRequest(_), _) | (_, false) => None,
            (_, true) => Some(self.to_string()),
        };

        (status, Json(ErrorResponse { error: message, details })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let (status, body) = body_json(AppError::BadRequest("No request data provided".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No request data provided");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_report_error_is_generic() {
        let (status, body) = body_json(AppError::Report(ReportError::Render("boom".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate PDF");
    }
}
