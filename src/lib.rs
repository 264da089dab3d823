//! site-mirror: a resumable single-site web mirror
//!
//! This crate crawls one website from a seed URL, follows same-origin links and
//! stores HTML, plain text and JSON resources in a local directory tree that
//! mirrors the URL paths. The crawl frontier and visited set are checkpointed
//! per origin so an interrupted crawl can be resumed.

pub mod config;
pub mod crawler;
pub mod mirror;
pub mod state;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for site-mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to prepare directory for {path}: {source}")]
    Materialize {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Session storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, AcceptAll, CrawlOptions, CrawlReport, LogSink, SubstringFilter, UrlFilter};
pub use state::CrawlState;
pub use url::{is_same_origin, strip_fragment, Origin};
