//! Multi-request table report
//!
//! A4 landscape with a title block, a fixed eight-column header and one
//! row per record. Pagination is planned up front by [`paginate`] so the
//! page-break rule can be checked without drawing anything.

use super::canvas::{Canvas, DrawOp, PageSize, Text};
use crate::request::{Color, RequestRecord};

pub const PAGE: PageSize = PageSize::A4_LANDSCAPE;
pub const MARGIN: f32 = 40.0;
pub const CONTENT_WIDTH: f32 = PAGE.width - 2.0 * MARGIN;

/// First header row top edge on page one
pub const TABLE_TOP: f32 = 85.0;
pub const HEADER_HEIGHT: f32 = 25.0;
pub const ROW_HEIGHT: f32 = 20.0;

/// A row may only start at or above `PAGE.height - FOOTER_RESERVE`
pub const FOOTER_RESERVE: f32 = 100.0;

const CELL_PADDING: f32 = 5.0;
const FOOTER_OFFSET: f32 = 25.0;

const NAVY: Color = Color::rgb(0x04, 0x04, 0x76);
const SUBTITLE_GREY: Color = Color::rgb(0x66, 0x66, 0x66);
const STRIPE: Color = Color::rgb(0xF5, 0xF7, 0xFA);
const FOOTER_GREY: Color = Color::rgb(0x99, 0x99, 0x99);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub label: &'static str,
    pub width: f32,
}

pub const COLUMNS: [Column; 8] = [
    Column { label: "Request #", width: 75.0 },
    Column { label: "Status", width: 70.0 },
    Column { label: "College", width: 120.0 },
    Column { label: "Dept", width: 85.0 },
    Column { label: "Location", width: 85.0 },
    Column { label: "Description", width: 175.0 },
    Column { label: "Date", width: 80.0 },
    Column { label: "Amount", width: 70.0 },
];

const COLLEGE_CHARS: usize = 25;
const SHORT_CHARS: usize = 15;
const DESCRIPTION_CHARS: usize = 45;
const ELLIPSIS: &str = "...";

/// Where a record's row lands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    /// Position in the input list
    pub index: usize,
    /// Zero-based page
    pub page: usize,
    /// Top edge of the row
    pub y: f32,
}

/// Plan row positions for `count` records.
///
/// Before each row: if the cursor is past `PAGE.height - FOOTER_RESERVE`,
/// break to a new page, reset to the top margin and leave room for the
/// repeated header.
pub fn paginate(count: usize) -> Vec<RowPlacement> {
    let limit = PAGE.height - FOOTER_RESERVE;
    let mut placements = Vec::with_capacity(count);
    let mut page = 0;
    let mut y = TABLE_TOP + HEADER_HEIGHT;

    for index in 0..count {
        if y > limit {
            page += 1;
            y = MARGIN + HEADER_HEIGHT;
        }
        placements.push(RowPlacement { index, page, y });
        y += ROW_HEIGHT;
    }
    placements
}

/// Row background for a position in the full input list
pub fn stripe_color(index: usize) -> Color {
    if index % 2 == 0 {
        Color::WHITE
    } else {
        STRIPE
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Cell texts for one record, in column order
pub fn row_cells(record: &RequestRecord) -> [String; 8] {
    [
        record.id_display(),
        record.status_label(),
        truncate(&record.college(), COLLEGE_CHARS),
        truncate(&record.department(), SHORT_CHARS),
        truncate(&record.location(), SHORT_CHARS),
        format!("{}{}", truncate(&record.description(), DESCRIPTION_CHARS), ELLIPSIS),
        record.request_date(),
        record.amount().unwrap_or_else(|| "-".to_string()),
    ]
}

/// Left edge of each column's text
fn column_offsets() -> [f32; 8] {
    let mut offsets = [0.0; 8];
    let mut x = MARGIN + CELL_PADDING;
    for (offset, column) in offsets.iter_mut().zip(COLUMNS.iter()) {
        *offset = x;
        x += column.width;
    }
    offsets
}

/// Lay out the table report
pub fn layout(records: &[RequestRecord], generated_at: &str) -> Canvas {
    let mut canvas = Canvas::new(PAGE);
    let offsets = column_offsets();

    canvas.text(
        Text::new("Maintenance Requests Report", MARGIN, 30.0)
            .size(18.0)
            .bold()
            .color(NAVY),
    );
    canvas.text(
        Text::new(format!("Generated: {}", generated_at), MARGIN, 55.0)
            .size(10.0)
            .color(SUBTITLE_GREY),
    );
    draw_header(&mut canvas, &offsets, TABLE_TOP);

    for placement in paginate(records.len()) {
        if placement.page != canvas.current_page() {
            canvas.add_page();
            draw_header(&mut canvas, &offsets, MARGIN);
        }
        draw_row(&mut canvas, &offsets, &records[placement.index], placement);
    }

    stamp_footer(&mut canvas);
    canvas
}

/// Header band whose bottom edge is where [`paginate`] places the page's first row
fn draw_header(canvas: &mut Canvas, offsets: &[f32; 8], y: f32) {
    canvas.rect(MARGIN, y, CONTENT_WIDTH, HEADER_HEIGHT, NAVY);
    for (column, x) in COLUMNS.iter().zip(offsets) {
        canvas.text(
            Text::new(column.label, *x, y + 8.0)
                .size(9.0)
                .bold()
                .color(Color::WHITE)
                .clipped(column.width - 2.0 * CELL_PADDING),
        );
    }
}

fn draw_row(canvas: &mut Canvas, offsets: &[f32; 8], record: &RequestRecord, placement: RowPlacement) {
    let y = placement.y;
    canvas.rect(MARGIN, y, CONTENT_WIDTH, ROW_HEIGHT, stripe_color(placement.index));
    for ((cell, column), x) in row_cells(record).into_iter().zip(COLUMNS.iter()).zip(offsets) {
        canvas.text(
            Text::new(cell, *x, y + 6.0)
                .size(8.0)
                .clipped(column.width - 2.0 * CELL_PADDING),
        );
    }
}

fn stamp_footer(canvas: &mut Canvas) {
    let y = PAGE.height - FOOTER_OFFSET;
    canvas.stamp_pages(|page, number, total| {
        page.push(DrawOp::Text(
            Text::new(format!("Page {} of {}", number, total), 0.0, y)
                .size(8.0)
                .color(FOOTER_GREY)
                .centered(PAGE.width),
        ));
    });
}
