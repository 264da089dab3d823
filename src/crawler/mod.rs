//! Crawler module for site mirroring
//!
//! This module contains the core crawling logic, including:
//! - HTTP probing and fetching
//! - HTML link extraction
//! - Caller-supplied URL filters and progress reporting
//! - Overall crawl coordination with checkpointing

mod checkpoint;
mod coordinator;
mod fetcher;
mod filter;
mod parser;
mod progress;
mod report;

pub use checkpoint::SessionGuard;
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_url, probe_url, FetchedPage, ProbeResponse};
pub use filter::{AcceptAll, SubstringFilter, UrlFilter};
pub use parser::{extract_links, extract_links_from_html};
pub use progress::{LogSink, ProgressLog};
pub use report::CrawlReport;

use crate::config::Config;
use crate::MirrorError;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// What to crawl and where to put it
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Seed URL; `http://` is assumed when no scheme is given
    pub seed_url: String,
    /// Output directory; mirrored files and the `sessions` directory go here
    pub output_dir: PathBuf,
    /// Continue from the saved session of this origin, if any
    pub resume: bool,
    /// Crawler configuration
    pub config: Config,
}

/// Mirrors a website
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Parse the seed URL and derive the origin
/// 2. Load the previous session (when `resume` is set) or start from the seed
/// 3. Probe, fetch and store same-origin pages accepted by `filter`
/// 4. Stop when the frontier is empty or `cancel` is triggered
/// 5. Save the session
///
/// # Arguments
///
/// * `options` - Seed URL, output directory, resume flag and configuration
/// * `cancel` - Checked before each URL; an in-flight page finishes first
/// * `filter` - Decides which URLs are downloaded
/// * `log` - Optional receiver of human-readable progress lines
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl stopped and its session was saved
/// * `Err(MirrorError)` - Setup failed, or the session could not be saved
///
/// # Example
///
/// ```no_run
/// use site_mirror::crawler::{crawl, CrawlOptions, SubstringFilter};
/// use site_mirror::Config;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = CrawlOptions {
///     seed_url: "http://example.com".to_string(),
///     output_dir: "./websites".into(),
///     resume: true,
///     config: Config::default(),
/// };
/// let report = crawl(options, CancellationToken::new(), SubstringFilter::new("/en/"), None).await?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    options: CrawlOptions,
    cancel: CancellationToken,
    filter: impl UrlFilter + 'static,
    log: Option<LogSink>,
) -> Result<CrawlReport, MirrorError> {
    let coordinator = Coordinator::new(options, Box::new(filter), ProgressLog::new(log))?;
    coordinator.run(&cancel).await
}
