//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, info, warn};

use crate::constants::MEME_UNAVAILABLE;

/// Failures of the meme pipeline and the surface around it.
///
/// Every stage fails fast with one of these; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum MemeError {
    /// The scream store has no scream with this id
    #[error("Scream {0} not found")]
    ScreamNotFound(i32),
    /// The template search came back empty
    #[error("No meme templates found for query {0:?}")]
    NoTemplatesFound(String),
    /// The template search body did not have the expected shape
    #[error("Invalid template search response: {0}")]
    InvalidSearchResponse(String),
    /// The detail page carries no embedded page state
    #[error("No embedded template data on the page for {0:?}")]
    MissingEmbeddedData(String),
    /// The embedded page state is not a usable template description
    #[error("Invalid embedded template data: {0}")]
    InvalidTemplateSchema(String),
    /// The template image could not be downloaded
    #[error("Failed to fetch template image: {0}")]
    ImageFetch(String),
    /// The template image could not be decoded or the result encoded
    #[error("Image codec error: {0}")]
    ImageCodec(#[from] image::ImageError),
    /// The configured caption font could not be loaded
    #[error("Failed to load caption font: {0}")]
    FontLoad(String),
    /// Transport failure talking to an upstream service
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    /// A configured or derived URL is not valid
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// When DB operations fail
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// The caller's deadline elapsed before the meme was ready
    #[error("Meme generation took too long")]
    DeadlineExceeded,
}

impl IntoResponse for MemeError {
    fn into_response(self) -> Response {
        match self {
            MemeError::ScreamNotFound(id) => {
                info!("Meme requested for unknown scream {id}");
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"message": "Scream not found"})),
                )
                    .into_response()
            }
            MemeError::DeadlineExceeded => {
                warn!("Meme generation deadline exceeded");
                (StatusCode::GATEWAY_TIMEOUT, MEME_UNAVAILABLE).into_response()
            }
            MemeError::FontLoad(_) | MemeError::InvalidUrl(_) | MemeError::Database(_) => {
                error!("Internal server error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            other => {
                error!("Meme generation failed: {}", other);
                (StatusCode::BAD_GATEWAY, MEME_UNAVAILABLE).into_response()
            }
        }
    }
}
