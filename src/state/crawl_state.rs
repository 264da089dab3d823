//! Frontier and visited-set bookkeeping for one crawl
//!
//! The frontier is a set, not a queue: pop order is unspecified and only
//! membership matters.

use crate::storage::SessionSnapshot;
use std::collections::HashSet;

/// The in-memory state of a crawl: URLs still to fetch and URLs already processed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlState {
    frontier: HashSet<String>,
    visited: HashSet<String>,
}

impl CrawlState {
    /// Starts a fresh crawl containing only the seed
    pub fn fresh(seed: impl Into<String>) -> Self {
        let mut frontier = HashSet::new();
        frontier.insert(seed.into());
        Self {
            frontier,
            visited: HashSet::new(),
        }
    }

    /// Restores a crawl from a persisted snapshot
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            frontier: snapshot.pending,
            visited: snapshot.visited,
        }
    }

    /// Copies the current sets into a snapshot for persistence
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            pending: self.frontier.clone(),
            visited: self.visited.clone(),
        }
    }

    /// Removes and returns an arbitrary URL from the frontier
    pub fn pop(&mut self) -> Option<String> {
        let next = self.frontier.iter().next()?.clone();
        self.frontier.take(&next)
    }

    /// Adds a discovered URL to the frontier
    ///
    /// Returns false if the URL was already visited or already queued.
    pub fn enqueue(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.visited.contains(&url) {
            return false;
        }
        self.frontier.insert(url)
    }

    /// Records a URL as processed; returns false if it already was
    pub fn mark_visited(&mut self, url: impl Into<String>) -> bool {
        self.visited.insert(url.into())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.frontier.contains(url)
    }

    pub fn has_pending(&self) -> bool {
        !self.frontier.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.frontier.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending(&self) -> &HashSet<String> {
        &self.frontier
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }
}
