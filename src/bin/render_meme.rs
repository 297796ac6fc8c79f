//! Render one meme to a file, from free text or a stored scream.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use innoscream::config::setup_logging;
use innoscream::constants::{DEFAULT_REQUEST_TIMEOUT_SECONDS, DEFAULT_SUPERMEME_URL};
use innoscream::error::MemeError;
use innoscream::meme::MemePipeline;
use innoscream::meme::metrics::FontFile;
use innoscream::supermeme::Supermeme;
use innoscream::upstream::ScreamStore;
use url::Url;

/// Render a meme without running the server.
///
///   render_meme --captions-font Impact.ttf "when the build is green on the first try"
///   render_meme --captions-font Impact.ttf --scream-id 12
#[derive(Parser, Debug)]
#[command(name = "render_meme")]
struct Args {
    /// Caption text
    #[arg(required_unless_present = "scream_id", conflicts_with = "scream_id")]
    text: Option<String>,

    /// Caption a stored scream instead of free text
    #[arg(long)]
    scream_id: Option<i32>,

    /// Database holding the screams
    #[arg(long, default_value = "innoscream.sqlite", env = "INNOSCREAM_DATABASE_PATH")]
    database_path: String,

    /// Caption font file
    #[arg(long, env = "INNOSCREAM_CAPTIONS_FONT")]
    captions_font: PathBuf,

    /// Template service base URL
    #[arg(long, default_value = DEFAULT_SUPERMEME_URL, env = "INNOSCREAM_SUPERMEME_URL")]
    supermeme_url: Url,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECONDS)]
    request_timeout: u64,

    /// Where to write the image, defaults to `meme.<ext>` for the template's format
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// Stands in for the database when captioning free text.
struct NoScreams;

impl ScreamStore for NoScreams {
    async fn scream_text(&self, scream_id: i32) -> Result<String, MemeError> {
        Err(MemeError::ScreamNotFound(scream_id))
    }
}

fn output_path(requested: Option<PathBuf>, bytes: &[u8]) -> PathBuf {
    requested.unwrap_or_else(|| {
        let extension = image::guess_format(bytes)
            .ok()
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("png");
        PathBuf::from(format!("meme.{extension}"))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug).map_err(|err| anyhow::anyhow!("Logging setup failed: {err}"))?;

    let supermeme = Supermeme::new(
        args.supermeme_url.clone(),
        Duration::from_secs(args.request_timeout),
    )?;
    let fonts = FontFile::new(&args.captions_font);

    let bytes = match (args.scream_id, args.text.as_deref()) {
        (Some(scream_id), _) => {
            let db = innoscream::db::connect_db(&args.database_path)
                .await
                .with_context(|| format!("Failed to open {}", args.database_path))?;
            MemePipeline::new(db, supermeme, fonts)
                .generate(scream_id)
                .await?
        }
        (None, Some(text)) => {
            MemePipeline::new(NoScreams, supermeme, fonts)
                .render_text(text)
                .await?
        }
        (None, None) => anyhow::bail!("Nothing to caption"),
    };

    let output = output_path(args.output, &bytes);
    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!("Saved: {}", output.display());
    Ok(())
}
