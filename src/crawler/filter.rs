//! URL filters supplied by the caller
//!
//! A filter decides whether a same-origin URL is downloaded at all. It is
//! consulted when a URL is popped from the frontier and when a link is
//! discovered.

/// Caller-supplied URL predicate
///
/// Implemented for any `Fn(&str) -> bool` closure.
pub trait UrlFilter: Send + Sync {
    fn accept(&self, url: &str) -> bool;
}

impl<F> UrlFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accept(&self, url: &str) -> bool {
        self(url)
    }
}

/// Accepts every URL
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl UrlFilter for AcceptAll {
    fn accept(&self, _url: &str) -> bool {
        true
    }
}

/// Accepts URLs containing a piece of text; empty text accepts everything
#[derive(Debug, Clone, Default)]
pub struct SubstringFilter {
    needle: String,
}

impl SubstringFilter {
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
        }
    }
}

impl UrlFilter for SubstringFilter {
    fn accept(&self, url: &str) -> bool {
        url.contains(&self.needle)
    }
}
