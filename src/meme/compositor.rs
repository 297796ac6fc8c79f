//! Puts captions onto template images.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::debug;

use crate::constants::{CAPTION_INK, CAPTION_LINE_SPACING};
use crate::error::MemeError;
use crate::meme::layout::{place, wrap};
use crate::meme::metrics::TextPainter;
use crate::templates::{CaptionBox, TemplateDetail};
use crate::upstream::ImageFetch;

/// A template image being captioned, plus the format it arrived in.
#[derive(Clone, Debug)]
pub struct Meme {
    canvas: RgbaImage,
    format: Option<ImageFormat>,
}

impl Meme {
    /// Wraps an already decoded image.
    pub fn new(canvas: RgbaImage, format: Option<ImageFormat>) -> Self {
        Self { canvas, format }
    }

    /// Decodes fetched image bytes, remembering their format.
    pub fn decode(bytes: &[u8]) -> Result<Self, MemeError> {
        let format = image::guess_format(bytes).ok();
        let image = image::load_from_memory(bytes)?;
        Ok(Self {
            canvas: image.to_rgba8(),
            format,
        })
    }

    /// Pixel buffer.
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Format of the source image, if it could be recognised.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    /// Shrinks the image to fit inside `max_width x max_height`, keeping its
    /// aspect ratio. Never enlarges.
    pub fn fit_within(&mut self, max_width: u32, max_height: u32) {
        let current = self.dimensions();
        let target = fit_within(current, (max_width, max_height));
        if target != current {
            debug!("Resizing template image {current:?} -> {target:?}");
            self.canvas = imageops::resize(&self.canvas, target.0, target.1, FilterType::Lanczos3);
        }
    }
}

/// Thumbnail dimensions for `size` inside `bounds`.
pub fn fit_within(size: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (width, height) = size;
    let (max_width, max_height) = bounds;
    if width <= max_width && height <= max_height {
        return size;
    }

    let ratio = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let scaled = |value: u32, bound: u32| ((f64::from(value) * ratio).round() as u32).clamp(1, bound.max(1));
    (scaled(width, max_width), scaled(height, max_height))
}

/// Downloads the template image and shrinks it to the template's size.
pub async fn fetch_and_fit(
    fetcher: &impl ImageFetch,
    detail: &TemplateDetail,
) -> Result<Meme, MemeError> {
    let bytes = fetcher.fetch_image(&detail.image_url).await?;
    debug!("Fetched {} bytes from {}", bytes.len(), detail.image_url);
    let mut meme = Meme::decode(&bytes)?;
    meme.fit_within(detail.image_width, detail.image_height);
    Ok(meme)
}

/// Wraps `text` to the caption box and draws it centred in the box.
pub fn draw_caption<'meme>(
    meme: &'meme mut Meme,
    caption: &CaptionBox,
    text: &str,
    face: &impl TextPainter,
) -> &'meme mut Meme {
    let geometry = caption.geometry();
    let lines = wrap(text, geometry.width, face);
    let layout = place(&lines, geometry, CAPTION_LINE_SPACING, face);
    debug!("Caption wrapped to {} lines", layout.len());

    for placed in &layout {
        face.paint(
            &mut meme.canvas,
            placed.x.floor() as i32,
            placed.y.floor() as i32,
            &placed.line,
            CAPTION_INK,
        );
    }
    meme
}

/// Encodes the meme in its source format, or PNG when that is unknown or
/// cannot be written.
pub fn encode(meme: Meme) -> Result<Vec<u8>, MemeError> {
    let format = match meme.format {
        Some(format @ (ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Png)) => format,
        _ => ImageFormat::Png,
    };
    let image = DynamicImage::ImageRgba8(meme.canvas);
    let image = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(image.to_rgb8())
    } else {
        image
    };

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}
