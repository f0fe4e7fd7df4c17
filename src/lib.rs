// src/lib.rs
// =============================================================================
// The crawler as a library.
//
// - crawl: the concurrent crawl (visited set, events, task tree)
// - fetch: the Fetcher trait plus a fixture fetcher and an HTTP fetcher
//
// The binary in main.rs is a thin CLI on top of this.
// =============================================================================

pub mod crawl;
pub mod fetch;

pub use crawl::{CrawlEvent, CrawlOptions, CrawlSession, Crawler, VisitedSet};
pub use fetch::{FetchError, Fetcher, FixtureFetcher, HttpFetcher, HttpFetcherConfig, Page};
