//! site-mirror main entry point
//!
//! This is the command-line interface for the site-mirror crawler.

use clap::Parser;
use site_mirror::config::{load_config, Config};
use site_mirror::crawler::{crawl, CrawlOptions, SubstringFilter};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// site-mirror: download a website into a local directory tree
///
/// site-mirror follows same-origin links from the given URL and stores every
/// HTML, plain-text and JSON page under the output directory. Progress is
/// saved on exit, so an interrupted mirror can be resumed later.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version)]
#[command(about = "Mirror a website to the local filesystem", long_about = None)]
struct Cli {
    /// Website to mirror; http:// is assumed when no scheme is given
    #[arg(value_name = "URL")]
    url: String,

    /// Directory that receives the mirrored files and saved sessions
    #[arg(short, long, value_name = "DIR", default_value = "websites")]
    output: PathBuf,

    /// Only download URLs containing this text
    #[arg(long, value_name = "TEXT", default_value = "")]
    filter: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume the previous session for this website (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh session, ignoring previous progress
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let options = CrawlOptions {
        seed_url: cli.url,
        output_dir: cli.output,
        resume: cli.resume || !cli.fresh,
        config,
    };

    match crawl(options, cancel, SubstringFilter::new(cli.filter), None).await {
        Ok(report) => {
            if report.is_complete() {
                tracing::info!("Mirror complete: {}", report);
            } else {
                tracing::info!("Mirror stopped: {}", report);
            }
            println!("Terminated.");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Fatal error: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mirror=info,warn"),
            1 => EnvFilter::new("site_mirror=debug,info"),
            2 => EnvFilter::new("site_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Cancels the crawl on Ctrl-C; the page being downloaded finishes first
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received, stopping after the current page");
                cancel.cancel();
            }
            Err(e) => tracing::error!("Unable to listen for Ctrl-C: {}", e),
        }
    });
}
