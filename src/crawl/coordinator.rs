// src/crawl/coordinator.rs
// =============================================================================
// This module runs the crawl itself.
//
// How it works:
// 1. Every URL gets its own tokio task
// 2. The task claims the URL in the shared VisitedSet (skip if already taken)
// 3. It fetches the page and sends a Found or Error event
// 4. It spawns one child task per outbound link, each with a private channel
// 5. It drains each child's channel into its own, one child after another
// 6. When it returns, its sender is dropped, which tells the parent it is done
//
// Because every task only finishes after all of its children finished, the
// root channel closes exactly when the whole tree of tasks is done. The
// consumer sees that as the end of the stream.
//
// Rust concepts:
// - tokio::spawn: Runs a future as an independent task
// - mpsc channels: Many-producer, single-consumer queues between tasks
// - BoxFuture: A heap-allocated future, needed because a task spawns itself
// - Arc: Shared ownership of the fetcher and the visited set across tasks
// =============================================================================

use super::{CrawlEvent, VisitedSet};
use crate::fetch::{FetchError, Fetcher, Page};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// Tuning knobs for a crawl
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Buffer size of every per-task event channel (at least 1)
    pub channel_capacity: usize,
    /// Maximum number of fetches running at the same time (None = unlimited)
    pub max_in_flight: Option<usize>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
            max_in_flight: None,
        }
    }
}

/// Crawls a link graph with one task per page.
pub struct Crawler<F> {
    fetcher: Arc<F>,
    options: CrawlOptions,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_options(fetcher, CrawlOptions::default())
    }

    pub fn with_options(fetcher: F, options: CrawlOptions) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            options,
        }
    }

    /// Starts crawling from `start` and returns the stream of events.
    ///
    /// Must be called inside a tokio runtime. The crawl runs in the
    /// background; the session ends once every reachable page was handled.
    pub fn crawl(&self, start: impl Into<String>) -> CrawlSession {
        self.crawl_with_cancellation(start, CancellationToken::new())
    }

    /// Like [`Crawler::crawl`], but stops early once `cancel` fires.
    ///
    /// After cancellation no new fetch starts and fetches in progress are
    /// abandoned. Events sent before that are still delivered, and the
    /// session still ends normally.
    pub fn crawl_with_cancellation(
        &self,
        start: impl Into<String>,
        cancel: CancellationToken,
    ) -> CrawlSession {
        let start = start.into();
        let capacity = self.options.channel_capacity.max(1);
        let visited = Arc::new(VisitedSet::new());

        let ctx = Arc::new(CrawlContext {
            fetcher: Arc::clone(&self.fetcher),
            visited: Arc::clone(&visited),
            limiter: self
                .options
                .max_in_flight
                .map(|permits| Arc::new(Semaphore::new(permits.max(1)))),
            cancel,
            capacity,
        });

        info!(start = %start, "starting crawl");

        let (tx, rx) = mpsc::channel(capacity);
        tokio::spawn(visit(start, ctx, tx));

        CrawlSession { events: rx, visited }
    }
}

// State shared by every task of one crawl
struct CrawlContext<F> {
    fetcher: Arc<F>,
    visited: Arc<VisitedSet>,
    limiter: Option<Arc<Semaphore>>,
    cancel: CancellationToken,
    capacity: usize,
}

impl<F: Fetcher> CrawlContext<F> {
    // Runs one fetch, honoring the in-flight limit and cancellation.
    // Returns None if the crawl was cancelled first.
    async fn fetch(&self, url: &str) -> Option<Result<Page, FetchError>> {
        let fetch = async {
            // The permit lives only as long as the fetch
            let _permit = match &self.limiter {
                Some(limiter) => Some(limiter.acquire().await.ok()?),
                None => None,
            };
            Some(self.fetcher.fetch(url).await)
        };

        tokio::select! {
            _ = self.cancel.cancelled() => None,
            result = fetch => result,
        }
    }
}

// One crawl task: claim, fetch, report, fan out, fan in.
//
// Returns a boxed future because the task spawns copies of itself; an
// `async fn` calling itself would have an infinitely sized type.
fn visit<F: Fetcher>(
    url: String,
    ctx: Arc<CrawlContext<F>>,
    tx: mpsc::Sender<CrawlEvent>,
) -> BoxFuture<'static, ()> {
    async move {
        if ctx.cancel.is_cancelled() {
            return;
        }

        // The only place a URL is claimed. Losing here ends the task: some
        // other task (maybe an ancestor, on a cycle) owns this URL.
        if !ctx.visited.test_and_mark(&url) {
            debug!(url = %url, "already visited");
            return;
        }
        debug!(url = %url, "fetching");

        let page = match ctx.fetch(&url).await {
            None => return,
            Some(Ok(page)) => page,
            Some(Err(error)) => {
                warn!(url = %url, error = %error, "fetch failed");
                // No links, so no children. A closed channel means nobody listens.
                let _ = tx.send(CrawlEvent::error(error)).await;
                return;
            }
        };

        let Page { body, links } = page;
        if tx.send(CrawlEvent::found(url.as_str(), body)).await.is_err() {
            return;
        }

        if ctx.cancel.is_cancelled() {
            return;
        }

        // Fan out: every child runs on its own and writes to a private channel
        let children: Vec<mpsc::Receiver<CrawlEvent>> = links
            .into_iter()
            .map(|link| {
                let (child_tx, child_rx) = mpsc::channel(ctx.capacity);
                tokio::spawn(visit(link, Arc::clone(&ctx), child_tx));
                child_rx
            })
            .collect();

        // Fan in: a child's channel closes once its whole subtree is done
        for mut child in children {
            while let Some(event) = child.recv().await {
                if tx.send(event).await.is_err() {
                    // Consumer is gone. Dropping the remaining receivers makes
                    // the children's sends fail, so they unwind too.
                    return;
                }
            }
        }
    }
    .boxed()
}

/// The consumer side of a running crawl.
///
/// Yields every event exactly once and then ends. Dropping it early stops
/// the crawl: producers notice the closed channel and return.
pub struct CrawlSession {
    events: mpsc::Receiver<CrawlEvent>,
    visited: Arc<VisitedSet>,
}

impl CrawlSession {
    /// Next event, or None once the crawl has finished
    pub async fn next(&mut self) -> Option<CrawlEvent> {
        self.events.recv().await
    }

    /// Waits for the crawl to finish and returns all events in arrival order
    pub async fn collect(self) -> Vec<CrawlEvent> {
        StreamExt::collect(self).await
    }

    /// The events rendered as text lines
    pub fn lines(self) -> impl Stream<Item = String> {
        self.map(|event| event.to_string())
    }

    /// URLs claimed so far (final once the session has ended).
    ///
    /// After a cancellation this can be larger than the number of events:
    /// a URL claimed right before the cancel is counted but never reported.
    pub fn visited_count(&self) -> usize {
        self.visited.marked_count()
    }
}

impl Stream for CrawlSession {
    type Item = CrawlEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_recv(cx)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why can't two tasks fetch the same URL?
//    - Every task calls visited.test_and_mark() before fetching
//    - test_and_mark checks and inserts under one lock, so exactly one
//      caller gets `true` for a given URL
//    - The lock is never held across the fetch
//
// 2. Why does the crawl end on cycles?
//    - A -> B -> A: the second visit to A loses test_and_mark and returns
//    - A finite graph has finitely many URLs to claim, so finitely many tasks
//
// 3. Why does the stream end exactly once?
//    - The root task holds the only sender of the consumer's channel
//    - It drops it after draining all children, which drained theirs first
//    - mpsc::Receiver::recv() returns None once all senders are gone
//
// 4. Can siblings deadlock?
//    - A task only waits on its own children and on its parent reading
//    - Siblings never wait on each other, so there is no cycle of waiting
//    - A child blocked on a full channel resumes when the parent reaches it
// -----------------------------------------------------------------------------
