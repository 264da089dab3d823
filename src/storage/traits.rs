//! Storage traits and error types
//!
//! This module defines the trait interface for session storage backends and
//! associated error types.

use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// The persisted pair of crawl sets for one origin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// URLs discovered but not fetched yet
    pub pending: HashSet<String>,
    /// URLs already processed
    pub visited: HashSet<String>,
}

/// Trait for session storage implementations
///
/// A session is addressed by an origin key (see [`crate::storage::origin_key`]).
/// Implementations overwrite any earlier snapshot for the same key and do no
/// locking: two crawls of the same origin sharing a store will clobber each
/// other's snapshot.
pub trait SessionStorage {
    /// Loads the snapshot for an origin
    ///
    /// # Returns
    ///
    /// * `Ok(Some(snapshot))` - A complete snapshot was found
    /// * `Ok(None)` - No snapshot exists for this origin
    /// * `Err(StorageError)` - A snapshot exists but could not be read
    fn load(&self, key: &str) -> StorageResult<Option<SessionSnapshot>>;

    /// Saves the snapshot for an origin, replacing any previous one
    fn save(&self, key: &str, snapshot: &SessionSnapshot) -> StorageResult<()>;
}
