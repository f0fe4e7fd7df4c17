// src/crawl/mod.rs
// =============================================================================
// This module handles crawling.
//
// Features:
// - One concurrent task per discovered page
// - Every page fetched at most once, even on cyclic link graphs
// - Results streamed back as events while the crawl runs
// - Optional cap on concurrent fetches and early cancellation
//
// Submodules:
// - visited: the shared set of already-claimed URLs
// - event: the Found / Error events a crawl produces
// - coordinator: the crawl tasks and the session that streams their events
// =============================================================================

mod coordinator;
mod event;
mod visited;

// Re-export the public API
pub use coordinator::{CrawlOptions, CrawlSession, Crawler};
pub use event::CrawlEvent;
pub use visited::VisitedSet;
