//! HTTP client for the Supermeme template service.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::config::MemeConfig;
use crate::constants::{SEARCH_PATH, SEARCH_QUERY_PARAM, TEMPLATE_PAGE_SEGMENT};
use crate::error::MemeError;
use crate::upstream::{ImageFetch, TemplatePages, TemplateSearch};

/// Talks to a Supermeme-compatible template service.
#[derive(Clone, Debug)]
pub struct Supermeme {
    client: reqwest::Client,
    base_url: Url,
}

impl Supermeme {
    /// Client for the service at `base_url`; every request gives up after `timeout`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, MemeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Client built from the service configuration.
    pub fn from_config(config: &MemeConfig) -> Result<Self, MemeError> {
        Self::new(config.supermeme_url.clone(), config.request_timeout)
    }

    /// Base URL every request is made relative to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/search?searchQuery={query}`
    pub fn search_url(&self, query: &str) -> Result<Url, MemeError> {
        let mut url = self.base_url.join(SEARCH_PATH)?;
        url.query_pairs_mut()
            .clear()
            .append_pair(SEARCH_QUERY_PARAM, query);
        Ok(url)
    }

    /// `{base}/meme/{name}`, with `name` percent-encoded as one path segment.
    pub fn template_page_url(&self, name: &str) -> Result<Url, MemeError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(TEMPLATE_PAGE_SEGMENT)
            .push(name);
        Ok(url)
    }

    /// Absolute location of a template image; relative paths resolve against the base URL.
    pub fn image_url(&self, url: &str) -> Result<Url, MemeError> {
        Ok(self.base_url.join(url)?)
    }

    async fn get_text(&self, url: Url) -> Result<String, MemeError> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

impl TemplateSearch for Supermeme {
    async fn search_templates(&self, query: &str) -> Result<String, MemeError> {
        self.get_text(self.search_url(query)?).await
    }
}

impl TemplatePages for Supermeme {
    async fn template_page(&self, name: &str) -> Result<String, MemeError> {
        self.get_text(self.template_page_url(name)?).await
    }
}

impl ImageFetch for Supermeme {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, MemeError> {
        let url = self.image_url(url)?;
        debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MemeError::ImageFetch(format!("{status} for {url}")));
        }
        Ok(response.bytes().await?.to_vec())
    }
}
