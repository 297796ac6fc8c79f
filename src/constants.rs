//! Shared constants for the meme pipeline
//!

use image::Rgba;

/// Where the template service lives unless configured otherwise.
pub const DEFAULT_SUPERMEME_URL: &str = "https://supermeme.ai";

/// Search endpoint, relative to the template service base URL.
pub const SEARCH_PATH: &str = "api/search";

/// Query parameter carrying the search text.
pub const SEARCH_QUERY_PARAM: &str = "searchQuery";

/// Path segment that prefixes template detail pages.
pub const TEMPLATE_PAGE_SEGMENT: &str = "meme";

/// `id` of the script element holding the embedded page state.
pub const NEXT_DATA_ELEMENT_ID: &str = "__NEXT_DATA__";

/// Default per-request timeout (in seconds) for upstream HTTP calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default deadline (in seconds) for one whole meme generation.
pub const DEFAULT_GENERATE_DEADLINE_SECONDS: u64 = 60;

/// Vertical gap between caption lines, in pixels.
pub const CAPTION_LINE_SPACING: f32 = 5.0;

/// Glyph used to measure the caption line height.
pub const LINE_HEIGHT_REFERENCE: &str = "A";

/// Caption ink colour.
pub const CAPTION_INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Response body for failures that are not the caller's fault.
pub const MEME_UNAVAILABLE: &str = "Meme unavailable right now";
