//! Glyph metrics for caption fonts.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tracing::debug;

use crate::error::MemeError;
use crate::upstream::CaptionFonts;

/// Pixel extent of a rendered string.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtent {
    /// Horizontal caret travel, advances plus kerning
    pub width: f32,
    /// Height of the ink bounding box
    pub height: f32,
}

/// Measures strings for layout.
pub trait TextMetrics {
    /// Pixel extent of `text`; empty text is `0 x 0`.
    fn measure(&self, text: &str) -> TextExtent;
}

/// Draws strings onto an image.
pub trait TextPainter: TextMetrics {
    /// Draws `text` with its top-left corner at `(x, y)`.
    fn paint(&self, canvas: &mut RgbaImage, x: i32, y: i32, text: &str, ink: Rgba<u8>);
}

/// A loaded font at a fixed pixel size.
#[derive(Clone, Debug)]
pub struct CaptionFont {
    font: FontArc,
    scale: PxScale,
}

impl CaptionFont {
    /// Parses TrueType/OpenType bytes.
    pub fn from_bytes(data: Vec<u8>, font_size: f32) -> Result<Self, MemeError> {
        let font = FontArc::try_from_vec(data).map_err(|err| MemeError::FontLoad(err.to_string()))?;
        Ok(Self {
            font,
            scale: PxScale::from(font_size),
        })
    }

    /// Pixel size this face measures and draws at.
    pub fn font_size(&self) -> f32 {
        self.scale.y
    }
}

impl TextMetrics for CaptionFont {
    fn measure(&self, text: &str) -> TextExtent {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = 0.0_f32;
        let mut top = f32::INFINITY;
        let mut bottom = f32::NEG_INFINITY;
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(caret, scaled.ascent()));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                top = top.min(bounds.min.y);
                bottom = bottom.max(bounds.max.y);
            }
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        TextExtent {
            width: caret,
            height: if bottom > top { bottom - top } else { 0.0 },
        }
    }
}

impl TextPainter for CaptionFont {
    fn paint(&self, canvas: &mut RgbaImage, x: i32, y: i32, text: &str, ink: Rgba<u8>) {
        draw_text_mut(canvas, ink, x, y, self.scale, &self.font, text);
    }
}

/// The caption font configured for the service, read from disk on demand.
#[derive(Clone, Debug)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    /// Font at `path`; nothing is read until a face is requested.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the font file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptionFonts for FontFile {
    type Face = CaptionFont;

    async fn face(&self, font_size: f32) -> Result<CaptionFont, MemeError> {
        debug!("Loading caption font {} at {font_size}px", self.path.display());
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|err| MemeError::FontLoad(format!("{}: {err}", self.path.display())))?;
        CaptionFont::from_bytes(data, font_size)
    }
}
