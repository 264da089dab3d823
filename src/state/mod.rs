//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the frontier (URLs still to fetch) and the visited set

mod crawl_state;

pub use crawl_state::CrawlState;
