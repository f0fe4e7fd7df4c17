// src/fetch/http.rs
// =============================================================================
// A fetcher that downloads real pages over HTTP.
//
// Key functionality:
// - Makes GET requests with a shared reqwest client (connection pooling)
// - Maps HTTP failures onto FetchError variants
// - Extracts outbound links from the HTML body
// - Optionally stays on one host
// =============================================================================

use super::html::extract_links;
use super::{FetchError, Fetcher, Page};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

// Settings for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Timeout for a single request
    pub timeout: Duration,
    /// Only follow links on this host (None = follow everything)
    pub same_host: Option<String>,
    /// Value of the User-Agent header
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            same_host: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    same_host: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: HttpFetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            same_host: config.same_host,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let request_error = |e: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        classify_status(url, response.status())?;

        // Links are resolved against the final URL, after redirects
        let final_url = response.url().clone();
        let body = response.text().await.map_err(request_error)?;
        let links = extract_links(&body, &final_url, self.same_host.as_deref());

        Ok(Page { body, links })
    }
}

// Turns a non-success status into the matching error
fn classify_status(url: &str, status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) {
        Err(FetchError::NotFound {
            url: url.to_string(),
        })
    } else {
        Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// Host of `url`, used to restrict a crawl to the site it started on
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_string)
}
