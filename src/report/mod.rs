//! Report generation
//!
//! Layout and rendering are split in two stages:
//!
//! - `detail` / `table`: pure layout onto a [`Canvas`] (page breaks, cell
//!   contents, colours)
//! - `render`: `printpdf` output of a finished canvas
//!
//! [`ReportGenerator`] ties the two together for the HTTP handlers.

pub mod canvas;
pub mod detail;
pub mod fonts;
pub mod metrics;
pub mod render;
pub mod table;

use chrono::{DateTime, Local, TimeZone};

pub use canvas::{Canvas, DrawOp, FontFace, Page, PageSize, Text};
pub use fonts::FontSupport;

use crate::request::RequestRecord;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to load font: {0}")]
    Font(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("Report task failed: {0}")]
    Task(String),
}

/// A finished PDF document
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// `10/18/2026, 3:04:05 PM`
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Generation timestamp in server local time
pub fn timestamp_now() -> String {
    format_timestamp(&Local::now())
}

/// Renders reports with the process-wide font capability
#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    fonts: FontSupport,
}

impl ReportGenerator {
    pub fn new(fonts: FontSupport) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontSupport {
        &self.fonts
    }

    /// Single-record detail sheet
    pub fn detail(&self, record: &RequestRecord, generated_at: &str) -> Result<RenderedReport, ReportError> {
        let canvas = detail::layout(record, generated_at);
        let title = format!("Request {}", record.id_display());
        self.finish(&canvas, &title)
    }

    /// Paginated table of records
    pub fn table(&self, records: &[RequestRecord], generated_at: &str) -> Result<RenderedReport, ReportError> {
        let canvas = table::layout(records, generated_at);
        self.finish(&canvas, "Maintenance Requests Report")
    }

    fn finish(&self, canvas: &Canvas, title: &str) -> Result<RenderedReport, ReportError> {
        let bytes = render::render(canvas, title, &self.fonts)?;
        Ok(RenderedReport {
            bytes,
            pages: canvas.page_count(),
        })
    }
}
