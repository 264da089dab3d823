//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Loading a previous session or starting from the seed
//! - Popping URLs from the frontier and applying the caller's filter
//! - Probing, fetching and writing pages into the mirror
//! - Extracting links and growing the frontier
//! - Checkpointing the session whenever the loop stops

use crate::crawler::checkpoint::SessionGuard;
use crate::crawler::fetcher::{build_http_client, fetch_url, probe_url};
use crate::crawler::filter::UrlFilter;
use crate::crawler::parser::extract_links;
use crate::crawler::progress::ProgressLog;
use crate::crawler::report::CrawlReport;
use crate::crawler::CrawlOptions;
use crate::mirror::{destination_path, Mirror, Rejection};
use crate::state::CrawlState;
use crate::storage::{open_session_store, origin_key, FileSessionStore, SessionStorage};
use crate::url::{parse_seed_url, strip_fragment, Origin};
use crate::{MirrorError, UrlError};
use chrono::Local;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// What happened to a single URL
#[derive(Debug)]
enum PageOutcome {
    Saved {
        path: PathBuf,
        links_found: usize,
        links_queued: usize,
    },
    Rejected(Rejection),
    HttpStatus(u16),
}

/// Main crawler coordinator structure
pub struct Coordinator<S: SessionStorage> {
    client: Client,
    seed: String,
    origin: Origin,
    session_key: String,
    resume: bool,
    mirror: Mirror,
    store: S,
    filter: Box<dyn UrlFilter>,
    log: ProgressLog,
}

impl Coordinator<FileSessionStore> {
    /// Creates a coordinator that keeps its session under `<output>/sessions`
    ///
    /// The seed is checked before anything is created on disk.
    ///
    /// # Arguments
    ///
    /// * `options` - Seed URL, output directory, resume flag and configuration
    /// * `filter` - Caller-supplied URL filter
    /// * `log` - Progress reporting
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(MirrorError)` - Invalid seed URL, or the output directory or
    ///   HTTP client could not be set up
    pub fn new(
        options: CrawlOptions,
        filter: Box<dyn UrlFilter>,
        log: ProgressLog,
    ) -> Result<Self, MirrorError> {
        let (seed, origin) = seed_and_origin(&options.seed_url)?;
        std::fs::create_dir_all(&options.output_dir)?;
        let store = open_session_store(&options.output_dir)?;
        Self::assemble(options, seed, origin, store, filter, log)
    }
}

impl<S: SessionStorage> Coordinator<S> {
    /// Creates a coordinator with an explicit session store
    pub fn with_store(
        options: CrawlOptions,
        store: S,
        filter: Box<dyn UrlFilter>,
        log: ProgressLog,
    ) -> Result<Self, MirrorError> {
        let (seed, origin) = seed_and_origin(&options.seed_url)?;
        Self::assemble(options, seed, origin, store, filter, log)
    }

    fn assemble(
        options: CrawlOptions,
        seed: String,
        origin: Origin,
        store: S,
        filter: Box<dyn UrlFilter>,
        log: ProgressLog,
    ) -> Result<Self, MirrorError> {
        let session_key = origin_key(origin.location());
        let client = build_http_client(&options.config)?;
        let mirror = Mirror::new(
            options.output_dir,
            options.config.crawler.index_filename.clone(),
        );

        Ok(Self {
            client,
            seed,
            origin,
            session_key,
            resume: options.resume,
            mirror,
            store,
            filter,
            log,
        })
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Runs the crawl loop until the frontier is empty or `cancel` fires
    ///
    /// The session is saved when the loop stops, whatever the reason. A
    /// failure to save is the only error returned once the loop has started;
    /// per-URL failures are logged and counted in the report.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<CrawlReport, MirrorError> {
        self.log
            .info(format!("Downloading from website: {}", self.origin));

        let state = self.load_session();
        let mut session = SessionGuard::new(&self.store, &self.session_key, state);
        let mut report = CrawlReport::default();
        let start_time = Instant::now();

        while session.state().has_pending() && !cancel.is_cancelled() {
            let Some(url) = session.state_mut().pop() else {
                break;
            };
            self.log.info(format!(
                "Visiting {} ({})",
                url,
                Local::now().format("%Y-%m-%d %H:%M:%S")
            ));

            if session.state().is_visited(&url) {
                self.log.debug(format!("Already downloaded: {}", url));
                report.already_visited += 1;
                continue;
            }

            if !self.filter.accept(&url) {
                self.log.info(format!("URL removed by filter: {}", url));
                report.urls_filtered += 1;
                continue;
            }

            session.state_mut().mark_visited(url.clone());

            match self.process_url(&url, session.state_mut()).await {
                Ok(PageOutcome::Saved {
                    path,
                    links_found,
                    links_queued,
                }) => {
                    report.pages_saved += 1;
                    report.links_queued += links_queued as u64;
                    self.log.info(format!(
                        "Saved {} ({} links found, {} new)",
                        path.display(),
                        links_found,
                        links_queued
                    ));
                }
                Ok(PageOutcome::Rejected(reason)) => {
                    report.pages_rejected += 1;
                    self.log.info(format!("Skipping {}: {}", url, reason));
                }
                Ok(PageOutcome::HttpStatus(status_code)) => {
                    report.http_errors += 1;
                    self.log.warn(format!(
                        "Error while downloading {}, status code {}",
                        url, status_code
                    ));
                }
                Err(e) => {
                    report.pages_failed += 1;
                    self.log.error(format!("Error while processing {}: {}", url, e));
                }
            }

            let processed = report.urls_processed();
            if processed > 0 && processed % 25 == 0 {
                self.log.info(format!(
                    "Progress: {} pages saved, {} visited, {} in frontier",
                    report.pages_saved,
                    session.state().visited_count(),
                    session.state().pending_count()
                ));
            }
        }

        report.cancelled = cancel.is_cancelled();
        if report.cancelled {
            self.log.info(format!(
                "Crawl cancelled with {} URLs left to visit",
                session.state().pending_count()
            ));
        }

        let state = session.commit()?;
        report.pending_left = state.pending_count();
        report.visited_total = state.visited_count();
        report.elapsed = start_time.elapsed();

        self.log.info(format!(
            "Session saved for {}: {}",
            self.origin, report
        ));

        Ok(report)
    }

    /// Restores the previous session when asked to, otherwise starts from the seed
    fn load_session(&self) -> CrawlState {
        if !self.resume {
            self.log.info("Resume disabled, starting anew");
            return CrawlState::fresh(self.seed.clone());
        }

        self.log.info("Attempting to resume from previous session");
        match self.store.load(&self.session_key) {
            Ok(Some(snapshot)) => {
                let state = CrawlState::from_snapshot(snapshot);
                self.log.info(format!(
                    "Session loaded. Visited links: {}, links to visit: {}",
                    state.visited_count(),
                    state.pending_count()
                ));
                state
            }
            Ok(None) => {
                self.log.info("No previous session found, starting anew");
                CrawlState::fresh(self.seed.clone())
            }
            Err(e) => {
                self.log.warn(format!(
                    "Unable to load previous session, starting anew: {}",
                    e
                ));
                CrawlState::fresh(self.seed.clone())
            }
        }
    }

    /// Processes a single URL that has just been marked visited
    ///
    /// This method:
    /// 1. Probes the URL to resolve redirects and headers
    /// 2. Derives the destination path, or rejects the resource
    /// 3. Fetches the body
    /// 4. Writes it into the mirror
    /// 5. Queues the same-origin links it contains
    async fn process_url(
        &self,
        url: &str,
        state: &mut CrawlState,
    ) -> Result<PageOutcome, MirrorError> {
        self.log.debug("Sending head request");
        let probe = probe_url(&self.client, url).await?;

        let destination = match destination_path(
            &probe.final_url,
            probe.status_code,
            &probe.content_type,
            &self.origin,
        ) {
            Ok(destination) => destination,
            Err(rejection) => return Ok(PageOutcome::Rejected(rejection)),
        };

        self.log.debug("Sending get request");
        let page = fetch_url(&self.client, url).await?;
        if !page.is_success() {
            return Ok(PageOutcome::HttpStatus(page.status_code));
        }

        let stored = self.mirror.store(&destination, &page.body)?;
        for converted in &stored.converted {
            self.log
                .info(format!("Converted {} to a directory", converted.display()));
        }

        let links = extract_links(&page, &self.origin);
        let links_found = links.len();
        let mut links_queued = 0;
        for link in links {
            if state.is_visited(&link) || !self.filter.accept(&link) {
                continue;
            }
            if state.enqueue(link) {
                links_queued += 1;
            }
        }

        Ok(PageOutcome::Saved {
            path: stored.path,
            links_found,
            links_queued,
        })
    }
}

/// Parses the seed and derives the crawled origin
///
/// The seed enters the frontier without its fragment, like every other URL.
fn seed_and_origin(raw: &str) -> Result<(String, Origin), MirrorError> {
    let seed_url = parse_seed_url(raw)?;
    let origin =
        Origin::from_url(&seed_url).ok_or_else(|| UrlError::MissingHost(raw.to_string()))?;
    Ok((strip_fragment(seed_url).to_string(), origin))
}
