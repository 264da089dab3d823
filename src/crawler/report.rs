//! Crawl statistics
//!
//! Counters collected while the crawl loop runs and returned to the caller.

use std::fmt;
use std::time::Duration;

/// Summary of one crawl invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages written to the mirror
    pub pages_saved: u64,
    /// Pages the probe ruled out (origin, status or content type)
    pub pages_rejected: u64,
    /// Full fetches that came back with a non-200 status
    pub http_errors: u64,
    /// Pages that failed with a network or I/O error
    pub pages_failed: u64,
    /// URLs dropped by the caller's filter when popped
    pub urls_filtered: u64,
    /// Popped URLs that had already been processed
    pub already_visited: u64,
    /// New URLs added to the frontier
    pub links_queued: u64,
    /// Frontier size when the loop stopped
    pub pending_left: usize,
    /// Visited-set size when the loop stopped
    pub visited_total: usize,
    /// Whether the loop stopped because of cancellation
    pub cancelled: bool,
    /// Wall-clock duration of the crawl loop
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Number of URLs the loop actually worked on
    pub fn urls_processed(&self) -> u64 {
        self.pages_saved + self.pages_rejected + self.http_errors + self.pages_failed
    }

    /// Returns true if the loop ran out of URLs
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.pending_left == 0
    }
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} saved, {} rejected, {} HTTP errors, {} failed, {} filtered; {} visited, {} left to visit ({:.1}s)",
            self.pages_saved,
            self.pages_rejected,
            self.http_errors,
            self.pages_failed,
            self.urls_filtered,
            self.visited_total,
            self.pending_left,
            self.elapsed.as_secs_f64()
        )
    }
}
