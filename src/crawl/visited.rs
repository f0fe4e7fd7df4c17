// src/crawl/visited.rs
// =============================================================================
// The set of URLs that some crawl task has already claimed.
//
// There is exactly one operation that changes it: `test_and_mark`. It checks
// and inserts in a single atomic step, so when many tasks race for the same
// URL exactly one of them wins and goes on to fetch it. A separate
// "contains?" followed by "insert" would let two tasks both see "absent"
// and fetch the same page twice.
//
// Rust concepts:
// - DashSet: A concurrent HashSet, sharded with internal locks
// - &self methods on shared state: Interior mutability via the set's locks
// =============================================================================

use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the caller.
    ///
    /// Returns `true` if this call marked the URL (the caller owns it and
    /// must fetch it), `false` if it was already marked. Marks are never
    /// removed.
    pub fn test_and_mark(&self, url: &str) -> bool {
        // Only the shard holding `url` is locked, and only for the insert
        self.urls.insert(url.to_string())
    }

    /// Number of URLs claimed so far
    pub fn marked_count(&self) -> usize {
        self.urls.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_mark_wins() {
        let visited = VisitedSet::new();
        assert_eq!(visited.marked_count(), 0);

        assert!(visited.test_and_mark("https://golang.org/"));
        assert!(!visited.test_and_mark("https://golang.org/"));
        assert!(visited.test_and_mark("https://golang.org/pkg/"));

        assert!(!visited.test_and_mark("https://golang.org/pkg/"));
        assert_eq!(visited.marked_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_exactly_one_winner_under_contention() {
        let visited = Arc::new(VisitedSet::new());

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let visited = Arc::clone(&visited);
                tokio::spawn(async move { visited.test_and_mark("https://example.com/shared") })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(visited.marked_count(), 1);
    }
}
