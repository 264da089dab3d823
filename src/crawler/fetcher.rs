//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - HEAD probes that resolve redirects and headers without a body
//! - GET requests that download the body

use crate::config::Config;
use crate::MirrorError;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Headers of a resource, obtained without downloading its body
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value (empty if absent)
    pub content_type: String,
}

/// A fully downloaded resource
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value (empty if absent)
    pub content_type: String,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    pub fn is_html(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("text/html")
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::Config;
/// use site_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout))
        .redirect(Policy::limited(config.crawler.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a HEAD request, following redirects
///
/// Used to decide whether a resource is worth downloading before its body is
/// transferred.
pub async fn probe_url(client: &Client, url: &str) -> Result<ProbeResponse, MirrorError> {
    let response = client
        .head(url)
        .send()
        .await
        .map_err(|source| MirrorError::Http {
            url: url.to_string(),
            source,
        })?;

    Ok(ProbeResponse {
        final_url: response.url().clone(),
        status_code: response.status().as_u16(),
        content_type: content_type_of(response.headers()),
    })
}

/// Sends a GET request, following redirects, and reads the whole body
///
/// Non-success statuses are not errors here; the caller decides what to do
/// with them.
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedPage, MirrorError> {
    let http_error = |source: reqwest::Error| MirrorError::Http {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(http_error)?;

    let final_url = response.url().clone();
    let status_code = response.status().as_u16();
    let content_type = content_type_of(response.headers());
    let body = response.bytes().await.map_err(http_error)?.to_vec();

    Ok(FetchedPage {
        final_url,
        status_code,
        content_type,
        body,
    })
}

fn content_type_of(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}
