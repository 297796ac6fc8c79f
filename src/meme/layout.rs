//! Caption layout: greedy word wrap and centred placement.
//!
//! Both functions are pure; they only consult the [`TextMetrics`] they are
//! given. Positions are fractional pixels in image space.

use crate::constants::LINE_HEIGHT_REFERENCE;
use crate::meme::metrics::TextMetrics;

/// Pixel rectangle text is laid out in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxGeometry {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

/// One wrapped line and where to draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    /// Text of the line
    pub line: String,
    /// Left edge of the line
    pub x: f32,
    /// Top edge of the line
    pub y: f32,
}

/// Draw instructions, one per line, top to bottom.
pub type LayoutResult = Vec<PlacedLine>;

/// Greedily packs the words of `text` into lines no wider than `max_width`.
///
/// A word wider than `max_width` gets a line of its own and is never split.
pub fn wrap(text: &str, max_width: f32, metrics: &impl TextMetrics) -> Vec<String> {
    let break_width = metrics.measure(" ").width;

    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_width = metrics.measure(word).width;
        if current_width + word_width <= max_width {
            current.push(word);
            current_width += word_width + break_width;
        } else if current.is_empty() {
            lines.push(word.to_string());
            current_width = 0.0;
        } else {
            lines.push(current.join(" "));
            current.clear();
            current.push(word);
            current_width = word_width + break_width;
        }
    }

    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    lines
}

/// Centres `lines` inside `geometry`.
///
/// Every line is `line_height` tall, where `line_height` is the height of a
/// capital letter, and the block is centred on `line_count * line_height`
/// without the spacing. Tall blocks spill over the box edges; nothing is
/// clipped.
pub fn place(
    lines: &[String],
    geometry: BoxGeometry,
    line_spacing: f32,
    metrics: &impl TextMetrics,
) -> LayoutResult {
    let line_height = metrics.measure(LINE_HEIGHT_REFERENCE).height;

    let mut y = geometry.y + (geometry.height - lines.len() as f32 * line_height) / 2.0;
    let mut placed = Vec::with_capacity(lines.len());
    for line in lines {
        let line_width = metrics.measure(line).width;
        placed.push(PlacedLine {
            line: line.clone(),
            x: geometry.x + (geometry.width - line_width) / 2.0,
            y,
        });
        y += line_height + line_spacing;
    }
    placed
}
