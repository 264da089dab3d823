use regex::Regex;
use std::sync::LazyLock;

/// Anything outside word characters, `-`, `.`, `/` and `#` is dropped.
/// `/` and `#` are kept on purpose: `/` carries the directory structure.
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-\w./#]").expect("filename regex is valid"));

/// Makes a string safe to use as a relative file path
///
/// 1. Trim surrounding whitespace
/// 2. Replace each remaining whitespace character with `_`
/// 3. Remove every character that is not a (Unicode) word character,
///    `-`, `.`, `/` or `#`
///
/// Used both for mirrored page paths and for session file names.
///
/// # Examples
///
/// ```
/// use site_mirror::url::sanitize_filename;
///
/// assert_eq!(sanitize_filename("a.test/my page?x=1.html"), "a.test/my_pagex1.html");
/// assert_eq!(sanitize_filename("127.0.0.1:8080"), "127.0.0.18080");
/// ```
pub fn sanitize_filename(input: &str) -> String {
    let underscored: String = input
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    UNSAFE_CHARS.replace_all(&underscored, "").into_owned()
}
