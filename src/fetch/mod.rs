// src/fetch/mod.rs
// =============================================================================
// This module defines how pages are fetched.
//
// The crawler never talks to the network directly. It only knows about the
// `Fetcher` trait: give it a URL, get back the page body and the links on it
// (or an error). Anything that implements the trait can drive a crawl.
//
// Submodules:
// - fixture: an in-memory fetcher with canned pages (used for demos and tests)
// - http: a real fetcher built on reqwest
// - html: pulls links out of HTML documents for the http fetcher
//
// Rust concepts:
// - Traits: Shared behavior that many types can implement
// - async-trait: Lets traits have async methods
// - thiserror: Derives std::error::Error for our error enum
// =============================================================================

mod fixture;
mod html;
mod http;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

pub use fixture::FixtureFetcher;
pub use http::{host_of, HttpFetcher, HttpFetcherConfig};

// The result of a successful fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// The page content
    pub body: String,
    /// Outbound links, in the order they appeared on the page
    pub links: Vec<String>,
}

impl Page {
    pub fn new(body: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            body: body.into(),
            links,
        }
    }
}

// Why a fetch failed
//
// Every variant carries the URL so the message can stand on its own when it
// is printed as an output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// The resource does not exist (unknown fixture entry, HTTP 404/410)
    #[error("not found: {url}")]
    NotFound { url: String },

    /// The server answered with a non-success status
    #[error("HTTP {status}: {url}")]
    Status { url: String, status: u16 },

    /// The request never produced a response (timeout, DNS, TLS, ...)
    #[error("request failed: {url}: {message}")]
    Request { url: String, message: String },
}

impl FetchError {
    /// The URL that could not be fetched
    pub fn url(&self) -> &str {
        match self {
            FetchError::NotFound { url }
            | FetchError::Status { url, .. }
            | FetchError::Request { url, .. } => url,
        }
    }
}

/// Maps a URL to its content and outbound links.
///
/// Implementations are called from many tasks at once, so they must be
/// `Send + Sync` and must not assume exclusive access to anything.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

// Lets callers keep a handle on a fetcher after handing it to the crawler
#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        (**self).fetch(url).await
    }
}
