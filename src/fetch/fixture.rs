// src/fetch/fixture.rs
// =============================================================================
// An in-memory fetcher that serves canned pages.
//
// It is the default source for the CLI (the golang.org fixture below) and
// the workhorse of our tests: it counts how many times each URL was fetched
// and can pretend to be slow, so we can prove that no page is fetched twice
// even when many tasks race for it.
// =============================================================================

use super::{FetchError, Fetcher, Page};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, Page>,
    latency: Option<Duration>,
    // Per-URL fetch counters, updated from many tasks at once
    fetches: DashMap<String, usize>,
    total: AtomicUsize,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page; `links` are the URLs it points to.
    pub fn with_page(mut self, url: &str, body: &str, links: &[&str]) -> Self {
        let links = links.iter().map(|link| link.to_string()).collect();
        self.pages.insert(url.to_string(), Page::new(body, links));
        self
    }

    /// Sleeps this long inside every fetch
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The four-page golang.org graph. `https://golang.org/cmd/` is linked
    /// but missing, so it always fails with "not found".
    pub fn golang() -> Self {
        Self::new()
            .with_page(
                "https://golang.org/",
                "The Go Programming Language",
                &["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .with_page(
                "https://golang.org/pkg/",
                "Packages",
                &[
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                &["https://golang.org/", "https://golang.org/pkg/"],
            )
            .with_page(
                "https://golang.org/pkg/os/",
                "Package os",
                &["https://golang.org/", "https://golang.org/pkg/"],
            )
    }

    /// How many times `url` has been fetched (hits and misses both count)
    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.get(url).map(|count| *count).unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        *self.fetches.entry(url.to_string()).or_insert(0) += 1;
        self.total.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
    }
}
