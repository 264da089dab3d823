use crate::UrlError;
use url::Url;

/// Removes the fragment from a URL
///
/// `page#a` and `page#b` name the same resource, so every URL is stripped
/// before it enters the frontier or the visited set.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::strip_fragment;
///
/// let url = Url::parse("https://example.com/page#section").unwrap();
/// assert_eq!(strip_fragment(url).as_str(), "https://example.com/page");
/// ```
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Parses the seed URL typed by the user
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prepend `http://` when no scheme is given (`example.com` -> `http://example.com`)
/// 3. Parse; reject if malformed
/// 4. Accept only HTTP and HTTPS
/// 5. Require a host
///
/// The fragment is kept here; the crawl strips it before the seed enters the
/// frontier.
///
/// # Arguments
///
/// * `input` - The raw seed URL
///
/// # Returns
///
/// * `Ok(Url)` - Parsed seed URL
/// * `Err(UrlError)` - Failed to parse or unsupported URL
pub fn parse_seed_url(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("seed URL is empty".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed.trim_start_matches("//"))
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(input.to_string()));
    }

    Ok(url)
}
