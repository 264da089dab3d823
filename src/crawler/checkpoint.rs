//! Scoped ownership of the crawl state
//!
//! The crawl loop works on the state through a [`SessionGuard`]. Committing
//! the guard saves the state and reports the result; a guard dropped without
//! commit (a panic in the loop, or the caller dropping the crawl future) still
//! saves from `Drop`, so no exit path skips the checkpoint.

use crate::state::CrawlState;
use crate::storage::{SessionStorage, StorageResult};

pub struct SessionGuard<'a, S: SessionStorage> {
    store: &'a S,
    key: &'a str,
    state: CrawlState,
    committed: bool,
}

impl<'a, S: SessionStorage> SessionGuard<'a, S> {
    pub fn new(store: &'a S, key: &'a str, state: CrawlState) -> Self {
        Self {
            store,
            key,
            state,
            committed: false,
        }
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CrawlState {
        &mut self.state
    }

    /// Saves the state and hands it back
    pub fn commit(mut self) -> StorageResult<CrawlState> {
        self.committed = true;
        let state = std::mem::take(&mut self.state);
        self.store.save(self.key, &state.snapshot())?;
        Ok(state)
    }
}

impl<S: SessionStorage> Drop for SessionGuard<'_, S> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match self.store.save(self.key, &self.state.snapshot()) {
            Ok(()) => tracing::warn!(
                "Crawl interrupted, session {} saved ({} pending, {} visited)",
                self.key,
                self.state.pending_count(),
                self.state.visited_count()
            ),
            Err(e) => tracing::error!("Failed to save session {}: {}", self.key, e),
        }
    }
}
