//! Storage module for persisting crawl sessions
//!
//! This module handles saving and restoring the frontier and visited set of a
//! crawl so that an interrupted crawl can pick up where it stopped. Sessions
//! live in a `sessions` directory inside the output directory, one file pair
//! per origin.

mod file;
mod traits;

pub use file::FileSessionStore;
pub use traits::{SessionSnapshot, SessionStorage, StorageError, StorageResult};

use crate::url::sanitize_filename;
use std::path::{Path, PathBuf};

/// Name of the session directory inside the output directory
pub const SESSIONS_DIR: &str = "sessions";

/// Filesystem-safe key for an origin location
///
/// # Examples
///
/// ```
/// use site_mirror::storage::origin_key;
///
/// assert_eq!(origin_key("www.example.com"), "www.example.com");
/// assert_eq!(origin_key("localhost:8080"), "localhost8080");
/// ```
pub fn origin_key(location: &str) -> String {
    sanitize_filename(location)
}

/// The session directory for an output directory
pub fn sessions_dir(output_dir: &Path) -> PathBuf {
    output_dir.join(SESSIONS_DIR)
}

/// Opens the file-backed session store of an output directory
pub fn open_session_store(output_dir: &Path) -> StorageResult<FileSessionStore> {
    FileSessionStore::new(sessions_dir(output_dir))
}
