//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_GENERATE_DEADLINE_SECONDS, DEFAULT_REQUEST_TIMEOUT_SECONDS, DEFAULT_SUPERMEME_URL,
};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "INNOSCREAM_DEBUG")]
    /// Enable debug logging. Env: INNOSCREAM_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "8000", env = "INNOSCREAM_PORT")]
    /// http listener, defaults to `8000`.
    /// Env: INNOSCREAM_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "INNOSCREAM_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: INNOSCREAM_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(
        long,
        short,
        default_value = "innoscream.sqlite",
        env = "INNOSCREAM_DATABASE_PATH"
    )]
    /// Path to the database file, eg `/data/innoscream.sqlite`.
    /// Env: INNOSCREAM_DATABASE_PATH
    pub database_path: String,

    #[clap(long, default_value = DEFAULT_SUPERMEME_URL, env = "INNOSCREAM_SUPERMEME_URL")]
    /// Base URL of the meme template service.
    /// Env: INNOSCREAM_SUPERMEME_URL
    pub supermeme_url: String,

    #[clap(long, env = "INNOSCREAM_CAPTIONS_FONT")]
    /// TrueType/OpenType font used for captions, eg `/usr/share/fonts/Impact.ttf`.
    /// Env: INNOSCREAM_CAPTIONS_FONT
    pub captions_font: PathBuf,

    #[clap(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECONDS, env = "INNOSCREAM_REQUEST_TIMEOUT")]
    /// Timeout for each upstream request, in seconds.
    /// Env: INNOSCREAM_REQUEST_TIMEOUT
    pub request_timeout: u64,

    #[clap(long, default_value_t = DEFAULT_GENERATE_DEADLINE_SECONDS, env = "INNOSCREAM_GENERATE_DEADLINE")]
    /// Deadline for generating one meme, in seconds.
    /// Env: INNOSCREAM_GENERATE_DEADLINE
    pub generate_deadline: u64,
}
