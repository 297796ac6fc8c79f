//! Interfaces to the collaborators the meme pipeline consumes.
//!
//! The pipeline only ever talks to these traits; [`crate::supermeme::Supermeme`],
//! [`crate::meme::metrics::FontFile`] and the SQLite store are the production
//! implementations.

use std::future::Future;

use crate::error::MemeError;
use crate::meme::metrics::TextPainter;

/// Looks up scream text by id.
pub trait ScreamStore: Send + Sync {
    /// Returns the scream text, or [`MemeError::ScreamNotFound`].
    fn scream_text(&self, scream_id: i32) -> impl Future<Output = Result<String, MemeError>> + Send;
}

/// Free-text search over meme templates.
pub trait TemplateSearch: Send + Sync {
    /// Returns the raw search response body for `query`.
    fn search_templates(&self, query: &str) -> impl Future<Output = Result<String, MemeError>> + Send;
}

/// Template detail pages.
pub trait TemplatePages: Send + Sync {
    /// Returns the HTML of the detail page for the named template.
    fn template_page(&self, name: &str) -> impl Future<Output = Result<String, MemeError>> + Send;
}

/// Downloads template images.
pub trait ImageFetch: Send + Sync {
    /// Returns the raw bytes behind `url`; non-success statuses are
    /// [`MemeError::ImageFetch`].
    fn fetch_image(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, MemeError>> + Send;
}

/// Supplies the caption font at a given pixel size.
pub trait CaptionFonts: Send + Sync {
    /// Sized font face used for measuring and drawing.
    type Face: TextPainter + Send;

    /// Loads the face for `font_size`, or fails with [`MemeError::FontLoad`].
    fn face(&self, font_size: f32) -> impl Future<Output = Result<Self::Face, MemeError>> + Send;
}
