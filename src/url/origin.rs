use url::Url;

/// Extracts the network location (`host[:port]`) from a URL
///
/// Default ports are elided by the URL parser, so `http://example.com:80/`
/// and `http://example.com/` share the location `example.com`.
///
/// # Returns
///
/// * `Some(String)` - The location
/// * `None` - If the URL has no host (e.g. `mailto:` or `data:` URLs)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::location_of;
///
/// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
/// assert_eq!(location_of(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn location_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

/// Tests whether a candidate location belongs to the crawled site
///
/// True iff the candidate equals the origin, or equals the origin with a
/// `www.` prefix. The reverse is not accepted: with origin `www.example.com`
/// the candidate `example.com` is foreign. URL filters built on top of this
/// may depend on that exact behavior, so it is kept as is.
pub fn is_same_origin(candidate: &str, origin: &str) -> bool {
    candidate == origin || candidate.strip_prefix("www.") == Some(origin)
}

/// The location of the seed URL, used to keep the crawl on one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    location: String,
}

impl Origin {
    /// Builds the origin from a raw location string
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Builds the origin from the seed URL; `None` when the URL has no host
    pub fn from_url(url: &Url) -> Option<Self> {
        location_of(url).map(Self::new)
    }

    /// The `host[:port]` string of this origin
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns true if the URL's location is same-origin with this one
    pub fn allows(&self, url: &Url) -> bool {
        location_of(url)
            .map(|location| is_same_origin(&location, &self.location))
            .unwrap_or(false)
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.location)
    }
}
