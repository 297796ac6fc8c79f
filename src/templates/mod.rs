//! Meme template resolution against the template service.
//!
//! Resolution is search, then the detail page of the first candidate, then
//! the page state embedded in that page. The first candidate is the only one
//! tried.

use serde::Deserialize;
use serde::de::{self, Deserializer};
use tracing::{debug, info, instrument};

use crate::error::MemeError;
use crate::meme::layout::BoxGeometry;
use crate::upstream::{TemplatePages, TemplateSearch};

pub mod next_data;

/// A search hit, in relevance order.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TemplateCandidate {
    /// Template name, used to address its detail page
    pub name: String,
    /// Preview image path
    #[serde(alias = "imagePath")]
    pub image_path: String,
    /// Human description of the template
    #[serde(default)]
    pub description: Option<String>,
    /// Example caption shipped with the template
    #[serde(default, rename = "meme_text", alias = "memeText", alias = "sampleText")]
    pub sample_text: Option<String>,
}

/// A caption rectangle on a template image.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionBox {
    /// Left edge in image pixels
    #[serde(deserialize_with = "whole_number")]
    pub x: i32,
    /// Top edge in image pixels
    #[serde(deserialize_with = "whole_number")]
    pub y: i32,
    /// Width in pixels
    #[serde(deserialize_with = "whole_number")]
    pub width: u32,
    /// Height in pixels
    #[serde(deserialize_with = "whole_number")]
    pub height: u32,
    /// Suggested font size in pixels
    pub font_size: f32,
    /// Suggested font family; the configured caption font always wins
    #[serde(default)]
    pub font_family: Option<String>,
    /// Rotation in degrees; not applied when drawing
    #[serde(default)]
    pub rotate_angle: f32,
    /// Language tag of the sample caption
    #[serde(default)]
    pub language: Option<String>,
    /// Sample caption text
    #[serde(default)]
    pub text: String,
}

impl CaptionBox {
    /// The box as a layout rectangle.
    pub fn geometry(&self) -> BoxGeometry {
        BoxGeometry {
            x: self.x as f32,
            y: self.y as f32,
            width: self.width as f32,
            height: self.height as f32,
        }
    }
}

/// A fully resolved template: where the image is and where captions go.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "PageProps")]
pub struct TemplateDetail {
    /// Image location, possibly relative to the template service
    pub image_url: String,
    /// Width the image should be shown at
    pub image_width: u32,
    /// Height the image should be shown at
    pub image_height: u32,
    /// Caption rectangles, never empty once validated
    pub caption_boxes: Vec<CaptionBox>,
    /// Title of the detail page
    pub page_title: Option<String>,
    /// Image name on the template service
    pub image_name: Option<String>,
    /// Image description on the template service
    pub image_description: Option<String>,
}

/// Page props as served. `imageSrc` and `initialCaptions` win over their
/// alternate names when both are present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageProps {
    #[serde(default)]
    image_src: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    image_width: u32,
    #[serde(deserialize_with = "whole_number")]
    image_height: u32,
    #[serde(default)]
    initial_captions: Option<Vec<CaptionBox>>,
    #[serde(default)]
    caption_boxes: Option<Vec<CaptionBox>>,
    #[serde(default)]
    page_title: Option<String>,
    #[serde(default)]
    image_name: Option<String>,
    #[serde(default)]
    image_description: Option<String>,
}

impl From<PageProps> for TemplateDetail {
    fn from(props: PageProps) -> Self {
        Self {
            image_url: props.image_src.or(props.image_url).unwrap_or_default(),
            image_width: props.image_width,
            image_height: props.image_height,
            caption_boxes: props
                .initial_captions
                .or(props.caption_boxes)
                .unwrap_or_default(),
            page_title: props.page_title,
            image_name: props.image_name,
            image_description: props.image_description,
        }
    }
}

/// Integer pixel values, also accepted when written as `10.0`.
fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(de::Error::custom(format!(
            "expected a whole number, got {value}"
        )));
    }
    T::try_from(value as i64)
        .map_err(|_| de::Error::custom(format!("{value} is out of range")))
}

impl TemplateDetail {
    /// The caption box memes are drawn into.
    pub fn primary_caption(&self) -> Result<&CaptionBox, MemeError> {
        self.caption_boxes.first().ok_or_else(|| {
            MemeError::InvalidTemplateSchema("template has no caption boxes".to_string())
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "memeTemplates")]
    meme_templates: Vec<TemplateCandidate>,
}

/// Searches for templates matching `query`, best match first.
#[instrument(level = "debug", skip(service))]
pub async fn search(
    service: &impl TemplateSearch,
    query: &str,
) -> Result<Vec<TemplateCandidate>, MemeError> {
    let body = service.search_templates(query).await?;
    let response: SearchResponse = serde_json::from_str(&body)
        .map_err(|err| MemeError::InvalidSearchResponse(err.to_string()))?;
    if response.meme_templates.is_empty() {
        return Err(MemeError::NoTemplatesFound(query.to_string()));
    }
    debug!("Template search returned {} candidates", response.meme_templates.len());
    Ok(response.meme_templates)
}

/// Fetches and parses the detail page of `candidate`.
#[instrument(level = "debug", skip_all, fields(template = %candidate.name))]
pub async fn resolve_detail(
    pages: &impl TemplatePages,
    candidate: &TemplateCandidate,
) -> Result<TemplateDetail, MemeError> {
    let html = pages.template_page(&candidate.name).await?;
    next_data::parse_template_page(&html, &candidate.name)
}

/// Resolves the best template for `query`.
pub async fn resolve(
    service: &(impl TemplateSearch + TemplatePages),
    query: &str,
) -> Result<TemplateDetail, MemeError> {
    let candidates = search(service, query).await?;
    let best = candidates
        .first()
        .ok_or_else(|| MemeError::NoTemplatesFound(query.to_string()))?;
    info!("Using meme template {:?}", best.name);
    resolve_detail(service, best).await
}
