//! Request status and its display colour

use serde::Serialize;

/// RGB colour used by the report canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

}

/// Known request statuses.
///
/// Labels are free text, so parsing is a case-insensitive substring match.
/// Anything unrecognised lands in `Unknown` and shares the waiting colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Waiting,
    Approved,
    Processing,
    Completed,
    Rejected,
    Unknown,
}

impl RequestStatus {
    /// Match order matters: "approved" wins over "completed" in a label containing both.
    pub fn parse(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("approved") {
            Self::Approved
        } else if lower.contains("processing") {
            Self::Processing
        } else if lower.contains("completed") {
            Self::Completed
        } else if lower.contains("rejected") {
            Self::Rejected
        } else if lower.contains("waiting") {
            Self::Waiting
        } else {
            Self::Unknown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::Approved => "Approved",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Rejected => "Rejected",
            Self::Unknown => "Unknown",
        }
    }

    /// Badge fill colour
    pub fn color(self) -> Color {
        match self {
            Self::Approved => Color::rgb(0xFF, 0xB7, 0x00),
            Self::Processing => Color::rgb(0x42, 0x79, 0x4D),
            Self::Completed => Color::rgb(0x09, 0x03, 0x4D),
            Self::Rejected => Color::rgb(0x96, 0x96, 0x96),
            Self::Waiting | Self::Unknown => Color::rgb(0xE6, 0x4D, 0x4D),
        }
    }
}
