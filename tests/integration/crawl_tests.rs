//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end against a temporary output directory.

use site_mirror::config::Config;
use site_mirror::crawler::{crawl, AcceptAll, CrawlOptions, LogSink, SubstringFilter};
use site_mirror::storage::{origin_key, FileSessionStore, SessionSnapshot, SessionStorage};
use site_mirror::url::location_of;
use site_mirror::MirrorError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves an HTML page for both the probe and the download
async fn mount_html(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("HEAD"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html"))
        .mount(server)
        .await;
}

fn options(server: &MockServer, dir: &TempDir, resume: bool) -> CrawlOptions {
    CrawlOptions {
        seed_url: format!("{}/", server.uri()),
        output_dir: dir.path().to_path_buf(),
        resume,
        config: Config::default(),
    }
}

fn url_of(server: &MockServer, page: &str) -> String {
    format!("{}{}", server.uri(), page)
}

/// Sanitized origin of the mock server, used for both the mirror directory and the session key
fn site_key(server: &MockServer) -> String {
    let base = Url::parse(&server.uri()).expect("Failed to parse base URL");
    origin_key(&location_of(&base).expect("Failed to extract location"))
}

fn site_dir(server: &MockServer, dir: &TempDir) -> PathBuf {
    dir.path().join(site_key(server))
}

fn saved_session(server: &MockServer, dir: &TempDir) -> SessionSnapshot {
    let store = FileSessionStore::new(dir.path().join("sessions")).expect("Failed to open store");
    store
        .load(&site_key(server))
        .expect("Failed to load session")
        .expect("No session saved")
}

/// A log sink that cancels the crawl once `pages` pages have been saved
fn cancel_after_saves(cancel: &CancellationToken, pages: usize) -> LogSink {
    let cancel = cancel.clone();
    let saved = AtomicUsize::new(0);
    Arc::new(move |line: &str| {
        if line.starts_with("Saved") && saved.fetch_add(1, Ordering::SeqCst) + 1 >= pages {
            cancel.cancel();
        }
    })
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("Request recording disabled")
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_single_iteration_saves_seed_and_queues_links() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_html(&server, "/", r#"<html><body><a href="/b">B</a></body></html>"#).await;

    let cancel = CancellationToken::new();
    let sink = cancel_after_saves(&cancel, 1);
    let report = crawl(options(&server, &dir, false), cancel, AcceptAll, Some(sink))
        .await
        .expect("Crawl failed");

    assert!(report.cancelled);
    assert_eq!(report.pages_saved, 1);

    let saved = std::fs::read_to_string(site_dir(&server, &dir).join("index.html")).unwrap();
    assert!(saved.contains(r#"<a href="/b">B</a>"#));

    let session = saved_session(&server, &dir);
    assert_eq!(session.pending.len(), 1);
    assert!(session.pending.contains(&url_of(&server, "/b")));
    assert_eq!(session.visited.len(), 1);
    assert!(session.visited.contains(&url_of(&server, "/")));

    assert!(!requested_paths(&server).await.contains(&"/b".to_string()));
}

#[tokio::test]
async fn test_missing_page_is_visited_without_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_html(&server, "/", r#"<a href="/missing">gone</a>"#).await;

    // The probe succeeds but the download does not
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            br#"<a href="/never">never</a>"#.to_vec(),
            "text/html",
        ))
        .mount(&server)
        .await;

    let report = crawl(options(&server, &dir, false), CancellationToken::new(), AcceptAll, None)
        .await
        .expect("Crawl failed");

    assert!(report.is_complete());
    assert_eq!(report.pages_saved, 1);
    assert_eq!(report.http_errors, 1);
    assert!(!site_dir(&server, &dir).join("missing.html").exists());

    let session = saved_session(&server, &dir);
    assert!(session.visited.contains(&url_of(&server, "/missing")));
    assert!(!session.visited.contains(&url_of(&server, "/never")));
    assert!(session.pending.is_empty());
}

#[tokio::test]
async fn test_pdf_is_rejected_without_download() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_html(&server, "/", r#"<a href="/report.pdf">report</a>"#).await;

    Mock::given(method("HEAD"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/pdf"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .expect(0) // Should never be called
        .mount(&server)
        .await;

    let report = crawl(options(&server, &dir, false), CancellationToken::new(), AcceptAll, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved, 1);
    assert_eq!(report.pages_rejected, 1);

    let site = site_dir(&server, &dir);
    let entries: Vec<_> = std::fs::read_dir(&site)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["index.html".to_string()]);

    let session = saved_session(&server, &dir);
    assert!(session.visited.contains(&url_of(&server, "/report.pdf")));
}

#[tokio::test]
async fn test_resume_does_not_refetch_visited() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            br#"<a href="/b">B</a>"#.to_vec(),
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            br#"<a href="/">home</a>"#.to_vec(),
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;

    // First run stops after the seed
    let cancel = CancellationToken::new();
    let sink = cancel_after_saves(&cancel, 1);
    let first = crawl(options(&server, &dir, true), cancel, AcceptAll, Some(sink))
        .await
        .expect("First crawl failed");
    assert!(first.cancelled);
    assert_eq!(first.pending_left, 1);

    // Second run picks up /b only
    let second = crawl(options(&server, &dir, true), CancellationToken::new(), AcceptAll, None)
        .await
        .expect("Second crawl failed");

    assert!(second.is_complete());
    assert_eq!(second.pages_saved, 1);
    assert_eq!(second.visited_total, 2);
    assert!(site_dir(&server, &dir).join("b.html").exists());

    let session = saved_session(&server, &dir);
    assert!(session.pending.is_empty());
    assert_eq!(session.visited.len(), 2);
}

#[tokio::test]
async fn test_fresh_run_ignores_previous_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_html(&server, "/", "<p>no links</p>").await;

    let store = FileSessionStore::new(dir.path().join("sessions")).unwrap();
    let previous = SessionSnapshot {
        pending: Default::default(),
        visited: [url_of(&server, "/")].into_iter().collect(),
    };
    store.save(&site_key(&server), &previous).unwrap();

    let report = crawl(options(&server, &dir, false), CancellationToken::new(), AcceptAll, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved, 1);
    assert!(site_dir(&server, &dir).join("index.html").exists());
}

#[tokio::test]
async fn test_cancellation_keeps_unfetched_urls_pending() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let pages: Vec<String> = (1..=5).map(|i| format!("/p{}", i)).collect();
    let seed_body: String = pages
        .iter()
        .map(|page| format!(r#"<a href="{}">{}</a>"#, page, page))
        .collect();
    mount_html(&server, "/", &seed_body).await;
    for page in &pages {
        mount_html(&server, page, "<p>leaf</p>").await;
    }

    // Seed plus two leaves, then stop with three left
    let cancel = CancellationToken::new();
    let sink = cancel_after_saves(&cancel, 3);
    let report = crawl(options(&server, &dir, false), cancel, AcceptAll, Some(sink))
        .await
        .expect("Crawl failed");

    assert!(report.cancelled);
    assert_eq!(report.pages_saved, 3);
    assert_eq!(report.pending_left, 3);

    let session = saved_session(&server, &dir);
    assert_eq!(session.pending.len(), 3);
    assert_eq!(session.visited.len(), 3);

    let requested = requested_paths(&server).await;
    for url in &session.pending {
        let page = Url::parse(url).unwrap().path().to_string();
        assert!(!requested.contains(&page), "{} was fetched but still pending", page);
        assert!(!session.visited.contains(url));
    }
    for page in &pages {
        let url = url_of(&server, page);
        assert!(session.pending.contains(&url) || session.visited.contains(&url));
    }
}

#[tokio::test]
async fn test_page_file_becomes_directory() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_html(
        &server,
        "/",
        r#"<a href="/docs">docs</a><a href="/docs.html/intro">intro</a>"#,
    )
    .await;
    mount_html(&server, "/docs", "<h1>Docs</h1>").await;
    mount_html(&server, "/docs.html/intro", "<h1>Intro</h1>").await;

    let report = crawl(options(&server, &dir, false), CancellationToken::new(), AcceptAll, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved, 3);

    // Whichever page came first, both end up inside the directory
    let docs = site_dir(&server, &dir).join("docs.html");
    assert!(docs.is_dir());
    assert_eq!(
        std::fs::read_to_string(docs.join("index.html")).unwrap(),
        "<h1>Docs</h1>"
    );
    assert_eq!(
        std::fs::read_to_string(docs.join("intro.html")).unwrap(),
        "<h1>Intro</h1>"
    );
}

#[tokio::test]
async fn test_redirect_saved_under_final_url() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_html(&server, "/", r#"<a href="/old">old</a>"#).await;
    mount_html(&server, "/new", "<p>moved here</p>").await;

    Mock::given(method("HEAD"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;

    let report = crawl(options(&server, &dir, false), CancellationToken::new(), AcceptAll, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved, 2);
    let site = site_dir(&server, &dir);
    assert!(site.join("new.html").exists());
    assert!(!site.join("old.html").exists());

    let session = saved_session(&server, &dir);
    assert!(session.visited.contains(&url_of(&server, "/old")));
}

#[tokio::test]
async fn test_corrupt_session_starts_fresh() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_html(&server, "/", "<p>home</p>").await;

    let sessions = dir.path().join("sessions");
    std::fs::create_dir_all(&sessions).unwrap();
    let key = site_key(&server);
    std::fs::write(sessions.join(format!("{}.pending.json", key)), "not json").unwrap();
    std::fs::write(sessions.join(format!("{}.visited.json", key)), "[").unwrap();

    let report = crawl(options(&server, &dir, true), CancellationToken::new(), AcceptAll, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved, 1);
    let session = saved_session(&server, &dir);
    assert!(session.visited.contains(&url_of(&server, "/")));
}

#[tokio::test]
async fn test_filter_limits_download() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_html(
        &server,
        "/en/",
        r#"<a href="/en/about">about</a><a href="/fr/about">a propos</a>"#,
    )
    .await;
    mount_html(&server, "/en/about", "<p>about</p>").await;
    mount_html(&server, "/fr/about", "<p>a propos</p>").await;

    let mut options = options(&server, &dir, false);
    options.seed_url = url_of(&server, "/en/");
    let report = crawl(options, CancellationToken::new(), SubstringFilter::new("/en/"), None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved, 2);
    assert!(!requested_paths(&server).await.contains(&"/fr/about".to_string()));

    let session = saved_session(&server, &dir);
    assert!(!session.visited.contains(&url_of(&server, "/fr/about")));
    assert!(session.pending.is_empty());
}

#[tokio::test]
async fn test_unusable_session_directory_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("sessions"), "in the way").unwrap();

    let result = crawl(options(&server, &dir, true), CancellationToken::new(), AcceptAll, None).await;

    assert!(matches!(result, Err(MirrorError::Storage(_))));
}

#[tokio::test]
async fn test_seed_fragment_does_not_duplicate_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            br#"<a href="/">home</a>"#.to_vec(),
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut options = options(&server, &dir, false);
    options.seed_url = url_of(&server, "/#top");
    let report = crawl(options, CancellationToken::new(), AcceptAll, None)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved, 1);
    let session = saved_session(&server, &dir);
    assert_eq!(session.visited.len(), 1);
    assert!(session.visited.contains(&url_of(&server, "/")));
}

#[tokio::test]
async fn test_checkpoint_failure_at_exit_is_returned() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_html(&server, "/", "<p>no links</p>").await;

    // Once the page is saved, put a plain file where the session directory was
    let sessions = dir.path().join("sessions");
    let sink: LogSink = Arc::new(move |line: &str| {
        if line.starts_with("Saved") && sessions.is_dir() {
            std::fs::remove_dir_all(&sessions).unwrap();
            std::fs::write(&sessions, "in the way").unwrap();
        }
    });

    let result = crawl(options(&server, &dir, false), CancellationToken::new(), AcceptAll, Some(sink)).await;

    assert!(matches!(result, Err(MirrorError::Storage(_))));
    assert!(site_dir(&server, &dir).join("index.html").exists());
}

#[tokio::test]
async fn test_failing_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_html(
        &server,
        "/",
        r#"<a href="/slow">slow</a><a href="/fast">fast</a>"#,
    )
    .await;
    mount_html(&server, "/fast", "<p>fast</p>").await;

    // The probe answers at once, the download outlives the request timeout
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<p>slow</p>".to_vec(), "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut options = options(&server, &dir, false);
    options.config.crawler.request_timeout = 1;
    let report = crawl(options, CancellationToken::new(), AcceptAll, None)
        .await
        .expect("Crawl failed");

    assert!(report.is_complete());
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.pages_saved, 2);

    let site = site_dir(&server, &dir);
    assert!(site.join("fast.html").exists());
    assert!(!site.join("slow.html").exists());

    let session = saved_session(&server, &dir);
    assert!(session.visited.contains(&url_of(&server, "/slow")));
    assert!(session.pending.is_empty());
}
