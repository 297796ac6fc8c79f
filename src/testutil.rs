//! Fakes shared by the unit tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use serde_json::{Value, json};

use crate::error::MemeError;
use crate::meme::metrics::{TextExtent, TextMetrics, TextPainter};
use crate::upstream::{CaptionFonts, ImageFetch, ScreamStore, TemplatePages, TemplateSearch};

/// Monospaced stand-in font: every char is `advance` wide, ink is `glyph_height` tall.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BlockFont {
    advance: f32,
    glyph_height: f32,
}

impl BlockFont {
    pub(crate) const fn new(advance: f32, glyph_height: f32) -> Self {
        Self {
            advance,
            glyph_height,
        }
    }
}

impl TextMetrics for BlockFont {
    fn measure(&self, text: &str) -> TextExtent {
        let has_ink = text.chars().any(|ch| !ch.is_whitespace());
        TextExtent {
            width: text.chars().count() as f32 * self.advance,
            height: if has_ink { self.glyph_height } else { 0.0 },
        }
    }
}

impl TextPainter for BlockFont {
    fn paint(&self, canvas: &mut RgbaImage, x: i32, y: i32, text: &str, ink: Rgba<u8>) {
        for (idx, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = x + (idx as f32 * self.advance) as i32;
            let rect = Rect::at(left, y).of_size(
                (self.advance as u32).saturating_sub(2).max(1),
                (self.glyph_height as u32).max(1),
            );
            draw_filled_rect_mut(canvas, rect, ink);
        }
    }
}

/// Hands out [`BlockFont`]s scaled to the requested size.
#[derive(Debug, Default)]
pub(crate) struct BlockFonts {
    requested: Mutex<Vec<f32>>,
}

impl BlockFonts {
    pub(crate) fn requested_sizes(&self) -> Vec<f32> {
        self.requested.lock().map(|sizes| sizes.clone()).unwrap_or_default()
    }
}

impl CaptionFonts for BlockFonts {
    type Face = BlockFont;

    async fn face(&self, font_size: f32) -> Result<BlockFont, MemeError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(font_size);
        }
        Ok(BlockFont::new(font_size / 2.0, font_size * 0.7))
    }
}

/// Scream store backed by a map.
#[derive(Debug, Default)]
pub(crate) struct MemoryScreams(pub(crate) HashMap<i32, String>);

impl ScreamStore for MemoryScreams {
    async fn scream_text(&self, scream_id: i32) -> Result<String, MemeError> {
        self.0
            .get(&scream_id)
            .cloned()
            .ok_or(MemeError::ScreamNotFound(scream_id))
    }
}

/// Canned template service that records every call it receives.
#[derive(Debug, Default)]
pub(crate) struct FakeUpstream {
    pub(crate) search_body: String,
    pub(crate) pages: HashMap<String, String>,
    pub(crate) images: HashMap<String, Vec<u8>>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl FakeUpstream {
    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub(crate) fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }
}

impl TemplateSearch for FakeUpstream {
    async fn search_templates(&self, query: &str) -> Result<String, MemeError> {
        self.record(format!("search:{query}"));
        Ok(self.search_body.clone())
    }
}

impl TemplatePages for FakeUpstream {
    async fn template_page(&self, name: &str) -> Result<String, MemeError> {
        self.record(format!("page:{name}"));
        Ok(self
            .pages
            .get(name)
            .cloned()
            .unwrap_or_else(|| "<html><body>Not found</body></html>".to_string()))
    }
}

impl ImageFetch for FakeUpstream {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, MemeError> {
        self.record(format!("image:{url}"));
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| MemeError::ImageFetch(format!("404 Not Found for {url}")))
    }
}

/// Search response body listing the given `(name, image_path)` pairs.
pub(crate) fn search_body(candidates: &[(&str, &str)]) -> String {
    let templates: Vec<Value> = candidates
        .iter()
        .map(|(name, image_path)| {
            json!({
                "name": name,
                "image_path": image_path,
                "description": format!("{name} description"),
                "meme_text": "",
                "score": 0.93,
            })
        })
        .collect();
    json!({ "memeTemplates": templates }).to_string()
}

/// Page props for a 300x200 template with one 280x180 caption box.
pub(crate) fn sample_page_props(image_url: &str) -> Value {
    json!({
        "pageTitle": "Test Meme",
        "imageSrc": image_url,
        "imageName": "test_meme",
        "imageDescription": "Test meme description",
        "imageWidth": 300,
        "imageHeight": 200,
        "initialCaptions": [{
            "x": 10,
            "y": 10,
            "text": "",
            "width": 280,
            "height": 180,
            "language": "en",
            "fontSize": 20,
            "fontFamily": "Impact",
            "rotateAngle": 0,
        }],
        "buildId": "ignored",
    })
}

/// HTML page embedding `page_props` the way the template service does.
pub(crate) fn next_data_page(page_props: &Value) -> String {
    let next_data = json!({
        "props": { "pageProps": page_props, "__N_SSP": true },
        "page": "/meme/[name]",
        "query": {},
    });
    format!(
        r#"<!DOCTYPE html><html><head><title>Meme</title></head><body><div id="__next"></div><script id="__NEXT_DATA__" type="application/json">{next_data}</script></body></html>"#
    )
}

/// Encodes a solid white image.
pub(crate) fn white_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([255, 255, 255, 255]),
    ));
    let image = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(image.to_rgb8())
    } else {
        image
    };
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("encode test image");
    bytes
}
