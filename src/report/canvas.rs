//! Page canvas
//!
//! Layout code draws onto a [`Canvas`]: a list of pages holding plain draw
//! operations in a top-left-origin point coordinate system. Nothing here
//! touches the PDF writer, so page breaks and cell contents can be checked
//! without rendering. [`super::render`] turns a finished canvas into bytes.

use crate::request::Color;

/// Page dimensions in points (72 points = 1 inch)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4_PORTRAIT: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    pub const A4_LANDSCAPE: PageSize = PageSize {
        width: 841.89,
        height: 595.28,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A single line of text.
///
/// `y` is the top of the line box. `width` is the box used for centring
/// and, when `clip` is set, the width the text is cut to at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub size: f32,
    pub face: FontFace,
    pub color: Color,
    pub align: Align,
    pub width: Option<f32>,
    pub clip: bool,
}

impl Text {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            size: 12.0,
            face: FontFace::Regular,
            color: Color::BLACK,
            align: Align::Left,
            width: None,
            clip: false,
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.face = FontFace::Bold;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Centre within `width`
    pub fn centered(mut self, width: f32) -> Self {
        self.width = Some(width);
        self.align = Align::Center;
        self
    }

    /// Single line, cut to `width`
    pub fn clipped(mut self, width: f32) -> Self {
        self.width = Some(width);
        self.clip = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
    },
    RoundedRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Color,
    },
    Text(Text),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// All text operations on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &Text> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.text == needle)
    }
}

/// Buffered pages; any page can be revisited until rendering
#[derive(Debug, Clone)]
pub struct Canvas {
    size: PageSize,
    pages: Vec<Page>,
    current: usize,
}

impl Canvas {
    /// New canvas with one empty page
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            pages: vec![Page::default()],
            current: 0,
        }
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Append a page and make it current
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::default());
        self.current = self.pages.len() - 1;
        self.current
    }

    fn push(&mut self, op: DrawOp) {
        let current = self.current;
        self.pages[current].push(op);
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Color) {
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
        });
    }

    pub fn rounded_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32, fill: Color) {
        self.push(DrawOp::RoundedRect {
            x,
            y,
            width,
            height,
            radius,
            fill,
        });
    }

    pub fn text(&mut self, text: Text) {
        self.push(DrawOp::Text(text));
    }

    /// Visit every page with its 1-based number and the final page count
    pub fn stamp_pages(&mut self, mut stamp: impl FnMut(&mut Page, usize, usize)) {
        let total = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate() {
            stamp(page, index + 1, total);
        }
    }
}
