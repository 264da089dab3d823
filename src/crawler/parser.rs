//! HTML link extraction
//!
//! Collects the `<a href>` targets of a fetched page that stay on the crawled
//! site. The HTML5 parser is error tolerant, so broken markup yields whatever
//! anchors it can still find instead of an error.

use crate::crawler::fetcher::FetchedPage;
use crate::url::{strip_fragment, Origin};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts same-origin links from a fetched page
///
/// Returns an empty set for anything that is not HTML. Links are resolved
/// against the page's final URL, so relative links on a redirected page point
/// to the right place.
pub fn extract_links(page: &FetchedPage, origin: &Origin) -> HashSet<String> {
    if !page.is_html() {
        tracing::debug!("Not an html file, unable to find links: {}", page.final_url);
        return HashSet::new();
    }

    let html = String::from_utf8_lossy(&page.body);
    extract_links_from_html(&html, &page.final_url, origin)
}

/// Extracts same-origin, fragment-free absolute links from raw HTML
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL the HTML was served from
/// * `origin` - The crawled site
///
/// # Example
///
/// ```
/// use site_mirror::crawler::extract_links_from_html;
/// use site_mirror::url::Origin;
/// use url::Url;
///
/// let base = Url::parse("http://a.test/").unwrap();
/// let links = extract_links_from_html(r#"<a href="/b#top">B</a>"#, &base, &Origin::new("a.test"));
/// assert!(links.contains("http://a.test/b"));
/// ```
pub fn extract_links_from_html(html: &str, base_url: &Url, origin: &Origin) -> HashSet<String> {
    let document = Html::parse_document(html);
    let mut links = HashSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_link(href, base_url, origin) {
                    links.insert(url);
                }
            }
        }
    }

    tracing::debug!("Found {} links on {}", links.len(), base_url);
    links
}

/// Resolves an href to an absolute same-origin URL without fragment
///
/// Returns None if the link should be excluded:
/// - Empty hrefs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution (`mailto:`, `javascript:`, `data:` ...)
/// - Other sites
fn resolve_link(href: &str, base_url: &Url, origin: &Origin) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    if !origin.allows(&absolute) {
        return None;
    }

    Some(strip_fragment(absolute).to_string())
}
