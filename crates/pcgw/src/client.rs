//! PCGamingWiki client.
//!
//! Async HTTP client using `reqwest`; one GET per title against the
//! appid lookup endpoint, which redirects to the article.

use std::time::Duration;

use reqwest::redirect::Policy;
use tracing::debug;

use crate::extract::save_paths_from_html;

const DEFAULT_BASE_URL: &str = "https://pcgamingwiki.com";
const MAX_REDIRECTS: usize = 10;

/// Errors from the PCGamingWiki client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
}

/// PCGamingWiki client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a new client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Sets a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Fetches the article HTML for a Steam appid.
    pub async fn fetch_page(&self, appid: &str) -> Result<String, Error> {
        let url = format!("{}/api/appid.php", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("appid", appid)])
            .send()
            .await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.text().await?)
    }

    /// Fetches the save paths documented for a Steam appid.
    ///
    /// `Ok(None)` means the article has no usable save location.
    pub async fn fetch_save_paths(&self, appid: &str) -> Result<Option<Vec<String>>, Error> {
        let html = self.fetch_page(appid).await?;
        let paths = save_paths_from_html(&html);
        debug!(
            appid,
            count = paths.as_ref().map_or(0, Vec::len),
            "parsed wiki article"
        );
        Ok(paths)
    }
}
