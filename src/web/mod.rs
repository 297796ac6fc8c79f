//! HTTP surface: one endpoint that turns a scream into a meme image.

use std::num::NonZeroU16;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::MemeError;
use crate::meme::MemePipeline;
use crate::meme::metrics::FontFile;
use crate::supermeme::Supermeme;
use crate::upstream::{CaptionFonts, ImageFetch, ScreamStore, TemplatePages, TemplateSearch};

/// The pipeline the server runs in production.
pub type ServicePipeline = MemePipeline<DatabaseConnection, Supermeme, FontFile>;

/// Shared handler state.
#[derive(Debug)]
pub struct AppState<S, U, F> {
    pipeline: Arc<MemePipeline<S, U, F>>,
    deadline: Duration,
}

impl<S, U, F> AppState<S, U, F> {
    /// State serving `pipeline`, giving each generation at most `deadline`.
    pub fn new(pipeline: MemePipeline<S, U, F>, deadline: Duration) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            deadline,
        }
    }
}

impl<S, U, F> Clone for AppState<S, U, F> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            deadline: self.deadline,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateParams {
    scream_id: i32,
}

async fn generate_handler<S, U, F>(
    State(state): State<AppState<S, U, F>>,
    Query(params): Query<GenerateParams>,
) -> Result<Response, MemeError>
where
    S: ScreamStore + 'static,
    U: TemplateSearch + TemplatePages + ImageFetch + 'static,
    F: CaptionFonts + 'static,
{
    let bytes = tokio::time::timeout(state.deadline, state.pipeline.generate(params.scream_id))
        .await
        .map_err(|_| MemeError::DeadlineExceeded)??;

    let content_type = image::guess_format(&bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("image/png");
    Ok(([(CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Routes for the meme service.
pub fn create_router<S, U, F>() -> Router<AppState<S, U, F>>
where
    S: ScreamStore + 'static,
    U: TemplateSearch + TemplatePages + ImageFetch + 'static,
    F: CaptionFonts + 'static,
{
    Router::new().route(
        "/memes/generate",
        axum::routing::post(generate_handler::<S, U, F>),
    )
}

/// Serves the meme endpoint on `listen_addr:port` until the listener fails.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    state: AppState<DatabaseConnection, Supermeme, FontFile>,
) -> Result<(), anyhow::Error> {
    let app = create_router().with_state(state);

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}
