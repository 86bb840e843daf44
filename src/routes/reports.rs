//! PDF report endpoints
//!
//! - `POST /generate-pdf`: detail sheet for one request
//! - `POST /generate-table-pdf`: paginated table of many requests
//!
//! The whole document is rendered in memory before any header is written,
//! so a failure never reaches the client as a truncated PDF.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::report::{timestamp_now, RenderedReport, ReportError, ReportGenerator};
use crate::request::RequestRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DetailReportBody {
    #[serde(default)]
    pub request: Option<RequestRecord>,
}

#[derive(Debug, Deserialize)]
pub struct TableReportBody {
    #[serde(default)]
    pub requests: Vec<RequestRecord>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-pdf", post(generate_pdf))
        .route("/generate-table-pdf", post(generate_table_pdf))
}

/// Generate the detail sheet for a single request
async fn generate_pdf(
    State(state): State<AppState>,
    Json(body): Json<DetailReportBody>,
) -> Result<Response> {
    let record = body
        .request
        .ok_or_else(|| AppError::BadRequest("No request data provided".to_string()))?;

    let report_id = Uuid::new_v4();
    let request_number = record.id();
    tracing::info!(%report_id, request_number = ?request_number, "Generating detail report");

    let generated_at = timestamp_now();
    let report = run_blocking(state.reports(), move |generator| {
        generator.detail(&record, &generated_at)
    })
    .await?;

    tracing::info!(%report_id, pages = report.pages, bytes = report.bytes.len(), "Detail report generated");

    let filename = format!("Request_{}.pdf", request_number.as_deref().unwrap_or("Unknown"));
    pdf_response(report, &filename)
}

/// Generate the table report for a list of requests
async fn generate_table_pdf(
    State(state): State<AppState>,
    Json(body): Json<TableReportBody>,
) -> Result<Response> {
    let report_id = Uuid::new_v4();
    let records = body.requests;
    tracing::info!(%report_id, rows = records.len(), "Generating table report");

    let generated_at = timestamp_now();
    let report = run_blocking(state.reports(), move |generator| {
        generator.table(&records, &generated_at)
    })
    .await?;

    tracing::info!(%report_id, pages = report.pages, bytes = report.bytes.len(), "Table report generated");

    let filename = format!("Requests_{}.pdf", Utc::now().format("%Y-%m-%d"));
    pdf_response(report, &filename)
}

/// Run a report job off the async workers. A panic while drawing comes back
/// as a join error and is treated like any other render failure.
async fn run_blocking<F>(generator: &ReportGenerator, job: F) -> std::result::Result<RenderedReport, ReportError>
where
    F: FnOnce(&ReportGenerator) -> std::result::Result<RenderedReport, ReportError> + Send + 'static,
{
    let generator = generator.clone();
    tokio::task::spawn_blocking(move || job(&generator))
        .await
        .map_err(|e| ReportError::Task(e.to_string()))?
}

/// Keep filenames header-safe: ASCII alphanumerics, `-`, `_` and `.`
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect()
}

/// `attachment; filename=...`, with an RFC 5987 `filename*` when sanitising changed the name
fn content_disposition(filename: &str) -> String {
    let safe = sanitize_filename(filename);
    if safe == filename {
        format!("attachment; filename={}", safe)
    } else {
        format!(
            "attachment; filename={}; filename*=UTF-8''{}",
            safe,
            urlencoding::encode(filename)
        )
    }
}

fn pdf_response(report: RenderedReport, filename: &str) -> Result<Response> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, report.bytes.len())
        .header(header::CONTENT_DISPOSITION, content_disposition(filename))
        .body(Body::from(report.bytes))?;
    Ok(response)
}
