//! URL to filesystem path mapping
//!
//! A fetched resource is stored at a path derived only from its final URL and
//! its content type, so a resumed crawl overwrites earlier output instead of
//! duplicating it.

use crate::url::{location_of, sanitize_filename, strip_fragment, Origin};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Prefixes removed from the URL text before it becomes a path
const SCHEME_PREFIXES: &[&str] = &["//", "http://", "https://"];

/// Suffix appended to the site root so it gets a file of its own
const ROOT_PAGE_NAME: &str = "index";

/// Content types the mirror stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Html,
    PlainText,
    Json,
}

impl ContentKind {
    /// Classifies a Content-Type header value
    ///
    /// Matching is by substring so parameters like `; charset=utf-8` are
    /// ignored. HTML is checked first, then plain text, then JSON.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("text/html") {
            Some(Self::Html)
        } else if content_type.contains("text/plain") {
            Some(Self::PlainText)
        } else if content_type.contains("application/json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// File extension (with the dot) used for this kind
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => ".html",
            Self::PlainText => ".txt",
            Self::Json => ".json",
        }
    }
}

/// Why a probed resource is not mirrored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Domain not allowed: {0}")]
    ForeignOrigin(String),

    #[error("Error while accessing page (status code {0})")]
    Status(u16),

    #[error("Content-type not allowed: {0}")]
    ContentType(String),
}

/// Derives the relative destination path of a probed resource
///
/// # Rejections
///
/// - the final URL (after redirects) is not same-origin
/// - the status code is not 200
/// - the content type is not HTML, plain text or JSON
///
/// # Arguments
///
/// * `final_url` - URL after following redirects
/// * `status_code` - HTTP status of the response
/// * `content_type` - Content-Type header value (empty if absent)
/// * `origin` - The crawled site
///
/// # Examples
///
/// ```
/// use site_mirror::mirror::destination_path;
/// use site_mirror::url::Origin;
/// use url::Url;
///
/// let origin = Origin::new("a.test");
/// let url = Url::parse("http://a.test/docs/intro").unwrap();
/// let path = destination_path(&url, 200, "text/html; charset=utf-8", &origin).unwrap();
/// assert_eq!(path, "a.test/docs/intro.html");
/// ```
pub fn destination_path(
    final_url: &Url,
    status_code: u16,
    content_type: &str,
    origin: &Origin,
) -> Result<String, Rejection> {
    if !origin.allows(final_url) {
        let location = location_of(final_url).unwrap_or_default();
        return Err(Rejection::ForeignOrigin(location));
    }

    if status_code != 200 {
        return Err(Rejection::Status(status_code));
    }

    let kind = ContentKind::from_content_type(content_type)
        .ok_or_else(|| Rejection::ContentType(content_type.to_string()))?;

    Ok(relative_path(final_url, kind))
}

/// Maps a URL and content kind to a sanitized relative path
///
/// The fragment and the scheme prefix are removed, a trailing `/` is trimmed
/// and the extension appended. The site root has no path left after
/// trimming, so it becomes `<host>/index<ext>`.
///
/// `http://host/` and `http://host/index` therefore share one file; the page
/// fetched last wins.
pub fn relative_path(url: &Url, kind: ContentKind) -> String {
    let text = strip_fragment(url.clone()).to_string();

    let mut path = text.as_str();
    for prefix in SCHEME_PREFIXES {
        if let Some(rest) = path.strip_prefix(prefix) {
            path = rest;
        }
    }
    let path = path.trim_end_matches('/');

    let mut mapped = if path.contains('/') {
        path.to_string()
    } else {
        format!("{}/{}", path, ROOT_PAGE_NAME)
    };
    mapped.push_str(kind.extension());

    sanitize_filename(&mapped)
}

/// Joins a relative destination onto the output directory
///
/// Only plain components are kept, so the result always stays below `root`.
pub fn resolve_in(root: &Path, relative: &str) -> PathBuf {
    let mut resolved = root.to_path_buf();
    for component in Path::new(relative).components() {
        if let Component::Normal(part) = component {
            resolved.push(part);
        }
    }
    resolved
}
