//! Config handling

use std::path::PathBuf;
use std::time::Duration;

use tracing::log::LevelFilter;
use url::Url;

use crate::cli::CliOptions;
use crate::error::MemeError;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("sqlx", LevelFilter::Warn)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Settings the meme pipeline needs, independent of how they were supplied.
#[derive(Clone, Debug)]
pub struct MemeConfig {
    /// Base URL of the template service
    pub supermeme_url: Url,
    /// Timeout applied to every upstream request
    pub request_timeout: Duration,
    /// Deadline for a whole generation, enforced by the HTTP layer
    pub generate_deadline: Duration,
    /// Caption font file
    pub captions_font: PathBuf,
}

impl TryFrom<&CliOptions> for MemeConfig {
    type Error = MemeError;

    fn try_from(cli: &CliOptions) -> Result<Self, Self::Error> {
        Ok(Self {
            supermeme_url: Url::parse(&cli.supermeme_url)?,
            request_timeout: Duration::from_secs(cli.request_timeout),
            generate_deadline: Duration::from_secs(cli.generate_deadline),
            captions_font: cli.captions_font.clone(),
        })
    }
}
