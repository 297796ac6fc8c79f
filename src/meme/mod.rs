//! Scream-to-meme pipeline.
//!
//! [`MemePipeline::generate`] runs every stage in order and stops at the first
//! failure; no stage is retried and errors are passed up unchanged.

use tracing::{info, instrument};

use crate::error::MemeError;
use crate::templates;
use crate::upstream::{CaptionFonts, ImageFetch, ScreamStore, TemplatePages, TemplateSearch};

pub mod compositor;
pub mod layout;
pub mod metrics;

/// Turns screams into meme images.
#[derive(Debug)]
pub struct MemePipeline<S, U, F> {
    screams: S,
    upstream: U,
    fonts: F,
}

impl<S, U, F> MemePipeline<S, U, F>
where
    S: ScreamStore,
    U: TemplateSearch + TemplatePages + ImageFetch,
    F: CaptionFonts,
{
    /// Builds a pipeline from its collaborators.
    pub fn new(screams: S, upstream: U, fonts: F) -> Self {
        Self {
            screams,
            upstream,
            fonts,
        }
    }

    /// Produces encoded meme bytes for the scream with `scream_id`.
    #[instrument(level = "info", skip(self))]
    pub async fn generate(&self, scream_id: i32) -> Result<Vec<u8>, MemeError> {
        let text = self.screams.scream_text(scream_id).await?;
        self.render_text(&text).await
    }

    /// Produces encoded meme bytes captioned with `text`.
    pub async fn render_text(&self, text: &str) -> Result<Vec<u8>, MemeError> {
        let detail = templates::resolve(&self.upstream, text).await?;
        let mut meme = compositor::fetch_and_fit(&self.upstream, &detail).await?;

        let caption = detail.primary_caption()?;
        let face = self.fonts.face(caption.font_size).await?;
        compositor::draw_caption(&mut meme, caption, text, &face);

        let bytes = compositor::encode(meme)?;
        info!(
            "Rendered {} byte meme on template {:?}",
            bytes.len(),
            detail.image_name.as_deref().unwrap_or(&detail.image_url)
        );
        Ok(bytes)
    }
}
