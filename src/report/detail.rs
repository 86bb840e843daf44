//! Single-request detail sheet
//!
//! A4 portrait: banner, status badge, basic information rows, wrapped
//! description, then a footer on every page. Each drawing step takes the
//! vertical cursor and returns where the next step starts.

use super::canvas::{Canvas, DrawOp, FontFace, PageSize, Text};
use super::metrics;
use crate::request::{Color, RequestRecord};

pub const PAGE: PageSize = PageSize::A4_PORTRAIT;
pub const MARGIN: f32 = 50.0;
pub const CONTENT_WIDTH: f32 = PAGE.width - 2.0 * MARGIN;

const BANNER_HEIGHT: f32 = 100.0;
const BADGE_TOP: f32 = 130.0;
const BADGE_WIDTH: f32 = 100.0;
const BADGE_HEIGHT: f32 = 25.0;
const LABEL_COLUMN: f32 = 120.0;
const ROW_HEIGHT: f32 = 20.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_OFFSET: f32 = 30.0;

/// Content must end above this distance from the page bottom
pub const FOOTER_RESERVE: f32 = 50.0;

const NAVY: Color = Color::rgb(0x04, 0x04, 0x76);
const SECTION_BG: Color = Color::rgb(0xF0, 0xF4, 0xFF);
const LABEL_GREY: Color = Color::rgb(0x66, 0x66, 0x66);
const FOOTER_GREY: Color = Color::rgb(0x99, 0x99, 0x99);

/// Lay out the detail sheet for one record
pub fn layout(record: &RequestRecord, generated_at: &str) -> Canvas {
    let mut canvas = Canvas::new(PAGE);

    let y = draw_banner(&mut canvas, record);
    let y = draw_status_badge(&mut canvas, record, y);
    let y = draw_section_header(&mut canvas, "Basic Information", y);
    let y = draw_fields(&mut canvas, record, y);
    let y = draw_description(&mut canvas, record, y);
    tracing::trace!(cursor = y, pages = canvas.page_count(), "Detail layout finished");

    stamp_footer(&mut canvas, generated_at);
    canvas
}

/// Start a new page when `needed` more points would run into the footer
fn ensure_space(canvas: &mut Canvas, y: f32, needed: f32) -> f32 {
    if y + needed > PAGE.height - FOOTER_RESERVE {
        canvas.add_page();
        MARGIN
    } else {
        y
    }
}

fn draw_banner(canvas: &mut Canvas, record: &RequestRecord) -> f32 {
    canvas.rect(0.0, 0.0, PAGE.width, BANNER_HEIGHT, NAVY);
    canvas.text(
        Text::new("Request Details", 0.0, 30.0)
            .size(22.0)
            .bold()
            .color(Color::WHITE)
            .centered(PAGE.width),
    );
    canvas.text(
        Text::new(format!("Request #: {}", record.id_display()), 0.0, 60.0)
            .size(12.0)
            .color(Color::WHITE)
            .centered(PAGE.width),
    );
    BADGE_TOP
}

fn draw_status_badge(canvas: &mut Canvas, record: &RequestRecord, y: f32) -> f32 {
    let color = record.status().color();
    canvas.rounded_rect(MARGIN, y, BADGE_WIDTH, BADGE_HEIGHT, 5.0, color);
    canvas.text(
        Text::new(record.status_label(), MARGIN + 10.0, y + 8.0)
            .size(BODY_SIZE)
            .bold()
            .color(Color::WHITE)
            .clipped(BADGE_WIDTH - 20.0),
    );
    y + 40.0
}

fn draw_section_header(canvas: &mut Canvas, title: &str, y: f32) -> f32 {
    let y = ensure_space(canvas, y, 30.0);
    canvas.rect(MARGIN, y, CONTENT_WIDTH, 20.0, SECTION_BG);
    canvas.text(
        Text::new(title, MARGIN + 5.0, y + 6.0)
            .size(12.0)
            .bold()
            .color(NAVY),
    );
    y + 30.0
}

/// Label/value rows in display order
pub fn field_rows(record: &RequestRecord) -> [(&'static str, String); 6] {
    [
        ("Date Submitted:", record.submitted_on()),
        ("Submitted by:", record.submitter()),
        ("College:", record.college()),
        ("Department:", record.department()),
        ("Location:", record.location()),
        ("Mobile:", record.mobile()),
    ]
}

fn draw_fields(canvas: &mut Canvas, record: &RequestRecord, y: f32) -> f32 {
    let value_width = CONTENT_WIDTH - LABEL_COLUMN;
    let line = metrics::line_height(BODY_SIZE);

    let mut y = y;
    for (label, value) in field_rows(record) {
        let lines = metrics::wrap(&value, value_width, BODY_SIZE, FontFace::Regular);
        let height = (lines.len() as f32 * line).max(ROW_HEIGHT);
        y = ensure_space(canvas, y, height);

        canvas.text(
            Text::new(label, MARGIN, y)
                .size(BODY_SIZE)
                .bold()
                .color(LABEL_GREY),
        );
        for (i, text) in lines.into_iter().enumerate() {
            canvas.text(
                Text::new(text, MARGIN + LABEL_COLUMN, y + i as f32 * line)
                    .size(BODY_SIZE)
                    .width(value_width),
            );
        }
        y += height;
    }
    y + 10.0
}

fn draw_description(canvas: &mut Canvas, record: &RequestRecord, y: f32) -> f32 {
    let y = ensure_space(canvas, y, 15.0 + metrics::line_height(BODY_SIZE));
    canvas.text(
        Text::new("Issue Description:", MARGIN, y)
            .size(BODY_SIZE)
            .bold()
            .color(LABEL_GREY),
    );
    let mut y = y + 15.0;

    let description = record.description();
    let line = metrics::line_height(BODY_SIZE);
    for text in metrics::wrap(&description, CONTENT_WIDTH, BODY_SIZE, FontFace::Regular) {
        y = ensure_space(canvas, y, line);
        canvas.text(Text::new(text, MARGIN, y).size(BODY_SIZE).width(CONTENT_WIDTH));
        y += line;
    }
    y + 20.0
}

fn stamp_footer(canvas: &mut Canvas, generated_at: &str) {
    let y = PAGE.height - FOOTER_OFFSET;
    canvas.stamp_pages(|page, number, total| {
        page.push(DrawOp::Text(
            Text::new(format!("Page {} of {}", number, total), 0.0, y)
                .size(8.0)
                .color(FOOTER_GREY)
                .centered(PAGE.width),
        ));
        page.push(DrawOp::Text(
            Text::new(format!("Generated: {}", generated_at), MARGIN, y)
                .size(8.0)
                .color(FOOTER_GREY),
        ));
    });
}
