//! PDF rendering
//!
//! Turns a laid-out [`Canvas`] into PDF bytes with `printpdf`. The canvas
//! uses a top-left origin in points; PDF pages use a bottom-left origin and
//! printpdf takes millimetres, so every coordinate is flipped and converted
//! here and nowhere else.

use std::io::Cursor;

use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};

use super::canvas::{Align, Canvas, DrawOp, FontFace, Text};
use super::fonts::FontSupport;
use super::metrics;
use super::ReportError;
use crate::request::Color;

const LAYER_NAME: &str = "Content";
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Baseline offset from the top of the line box, as a fraction of font size
const ASCENT: f32 = 0.8;

/// Magic numbers accepted as TrueType/OpenType data
const FONT_MAGICS: [[u8; 4]; 4] = [*b"\x00\x01\x00\x00", *b"OTTO", *b"true", *b"ttcf"];

fn mm(pt: f32) -> Mm {
    Mm(pt * MM_PER_PT)
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

/// Check that font bytes can be embedded
pub fn validate_font(bytes: &[u8]) -> Result<(), ReportError> {
    let magic_ok = bytes.len() >= 4 && FONT_MAGICS.iter().any(|m| bytes[..4] == m[..]);
    if !magic_ok {
        return Err(ReportError::Font("not a TrueType/OpenType file".to_string()));
    }
    let doc = PdfDocument::empty("font check");
    doc.add_external_font(Cursor::new(bytes))
        .map(|_| ())
        .map_err(|e| ReportError::Font(e.to_string()))
}

/// Font references registered with one document
struct FontSet {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl FontSet {
    fn register(doc: &PdfDocumentReference, fonts: &FontSupport) -> Result<Self, ReportError> {
        if let Some(script) = fonts.script() {
            let font = doc
                .add_external_font(Cursor::new(script.bytes.as_slice()))
                .map_err(|e| ReportError::Font(e.to_string()))?;
            return Ok(Self {
                regular: font.clone(),
                bold: font,
            });
        }

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        Ok(Self { regular, bold })
    }

    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        }
    }
}

/// Render every page of `canvas` into a PDF document
pub fn render(canvas: &Canvas, title: &str, fonts: &FontSupport) -> Result<Vec<u8>, ReportError> {
    let size = canvas.size();
    let (width, height) = (mm(size.width), mm(size.height));

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let faces = FontSet::register(&doc, fonts)?;

    for (index, page) in canvas.pages().iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, LAYER_NAME)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for op in page.ops() {
            draw(&layer, op, size.height, &faces);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ReportError::Render(e.to_string()))
}

fn draw(layer: &PdfLayerReference, op: &DrawOp, page_height: f32, faces: &FontSet) {
    match op {
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
        } => fill_rect(layer, *x, *y, *width, *height, *fill, page_height),
        DrawOp::RoundedRect {
            x,
            y,
            width,
            height,
            radius,
            fill,
        } => {
            // Two overlapping bands leave the corners cut back by the radius
            let r = radius.min(width / 2.0).min(height / 2.0);
            fill_rect(layer, x + r, *y, width - 2.0 * r, *height, *fill, page_height);
            fill_rect(layer, *x, y + r, *width, height - 2.0 * r, *fill, page_height);
        }
        DrawOp::Text(text) => draw_text(layer, text, page_height, faces),
    }
}

fn fill_rect(
    layer: &PdfLayerReference,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    fill: Color,
    page_height: f32,
) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    layer.set_fill_color(pdf_color(fill));
    let rect = Rect::new(
        mm(x),
        mm(page_height - y - height),
        mm(x + width),
        mm(page_height - y),
    );
    layer.add_rect(rect);
}

fn draw_text(layer: &PdfLayerReference, text: &Text, page_height: f32, faces: &FontSet) {
    let content = match (text.clip, text.width) {
        (true, Some(width)) => metrics::fit_to_width(&text.text, width, text.size, text.face),
        _ => text.text.as_str(),
    };
    if content.is_empty() {
        return;
    }

    let x = match (text.align, text.width) {
        (Align::Center, Some(width)) => {
            let used = metrics::text_width(content, text.size, text.face);
            text.x + ((width - used) / 2.0).max(0.0)
        }
        _ => text.x,
    };
    let baseline = text.y + text.size * ASCENT;

    layer.set_fill_color(pdf_color(text.color));
    layer.use_text(
        content,
        text.size,
        mm(x),
        mm(page_height - baseline),
        faces.get(text.face),
    );
}
