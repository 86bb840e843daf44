//! Approximate text metrics
//!
//! Widths follow the Helvetica advance widths by character class, in
//! thousandths of an em. Glyphs outside Latin use an average width, which
//! is close enough for wrapping and centring with the script font too.

use super::canvas::FontFace;

/// Line box height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

fn advance(c: char) -> u16 {
    match c {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | 'I' | '[' | ']' | 'f' | 't' | '\\' => 278,
        '\'' | '|' | 'i' | 'j' | 'l' => 222,
        '(' | ')' | '-' | '`' | 'r' => 333,
        '"' => 355,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 500,
        'm' => 833,
        'w' => 722,
        'M' => 833,
        'W' => 944,
        '@' => 1015,
        '%' => 889,
        '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722,
        'F' | 'T' | 'Z' => 611,
        'G' | 'O' | 'Q' => 778,
        'L' => 556,
        '0'..='9' | 'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 556,
        '#' | '$' | '?' | '_' => 556,
        '*' => 389,
        '+' | '<' | '=' | '>' | '~' => 584,
        c if c.is_ascii() => 556,
        _ => 500,
    }
}

/// Width of `text` in points
pub fn text_width(text: &str, size: f32, face: FontFace) -> f32 {
    let units: u32 = text.chars().map(|c| advance(c) as u32).sum();
    let bold = match face {
        FontFace::Bold => 1.05,
        FontFace::Regular => 1.0,
    };
    units as f32 / 1000.0 * size * bold
}

pub fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT_FACTOR
}

/// Longest prefix of `text` that fits in `width`
pub fn fit_to_width(text: &str, width: f32, size: f32, face: FontFace) -> &str {
    let mut used = 0.0;
    for (i, c) in text.char_indices() {
        used += text_width(c.encode_utf8(&mut [0; 4]), size, face);
        if used > width {
            return &text[..i];
        }
    }
    text
}

/// Greedy word wrap.
///
/// Explicit newlines start new lines; words wider than `width` are broken
/// at character boundaries. Empty input yields no lines.
pub fn wrap(text: &str, width: f32, size: f32, face: FontFace) -> Vec<String> {
    let mut lines = Vec::new();
    if text.is_empty() {
        return lines;
    }

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if text_width(&candidate, size, face) <= width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let mut rest = word;
            while text_width(rest, size, face) > width {
                let head = fit_to_width(rest, width, size, face);
                // Always make progress, even if a single glyph is wider than the line
                let head = if head.is_empty() {
                    let end = rest.chars().next().map(char::len_utf8).unwrap_or(rest.len());
                    &rest[..end]
                } else {
                    head
                };
                lines.push(head.to_string());
                rest = &rest[head.len()..];
            }
            line = rest.to_string();
        }
        lines.push(line);
    }
    lines
}
