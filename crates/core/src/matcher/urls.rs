//! Domain and URL helpers.
//!
//! Total functions: malformed input yields `None`/`false`, never an error.

use std::sync::LazyLock;

use regex::Regex;

/// Heuristic URL shape: scheme or `www.` prefix, no whitespace.
static URL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(https?://|www\.)\S+$").expect("URL_SHAPE pattern is valid"));

/// Prefix `https://` unless an explicit scheme is already present.
pub fn ensure_protocol(s: &str) -> String {
    if s.starts_with("http://") || s.starts_with("https://") {
        s.to_string()
    } else {
        format!("https://{s}")
    }
}

/// Extract the hostname from URL-ish text.
///
/// Applies [`ensure_protocol`] first, so bare domains work. Returns `None`
/// when the result does not parse as a URL with a host.
pub fn extract_domain(s: &str) -> Option<String> {
    let full = ensure_protocol(s.trim());
    let parsed = url::Url::parse(&full).ok()?;
    parsed.host_str().map(|h| h.to_string())
}

/// Heuristic test for whether text looks like a URL.
///
/// A hint only, never a guarantee: matches text starting with `http://`,
/// `https://`, or `www.` that contains no whitespace.
pub fn looks_like_url(s: &str) -> bool {
    URL_SHAPE.is_match(s.trim())
}

/// Whether text parses as an absolute http(s) URL.
pub fn is_valid_url(s: &str) -> bool {
    match url::Url::parse(s) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_protocol_adds_https() {
        assert_eq!(ensure_protocol("example.com"), "https://example.com");
    }

    #[test]
    fn test_ensure_protocol_keeps_existing() {
        assert_eq!(ensure_protocol("http://example.com"), "http://example.com");
        assert_eq!(ensure_protocol("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_extract_domain_bare() {
        assert_eq!(extract_domain("example.com/page").as_deref(), Some("example.com"));
    }

    #[test]
    fn test_extract_domain_with_scheme() {
        assert_eq!(extract_domain("http://sub.example.com:8080/x").as_deref(), Some("sub.example.com"));
    }

    #[test]
    fn test_extract_domain_malformed() {
        assert_eq!(extract_domain("not a url at all"), None);
    }

    #[test]
    fn test_looks_like_url() {
        assert!(looks_like_url("https://example.com/page"));
        assert!(looks_like_url("http://example.com"));
        assert!(looks_like_url("www.example.com"));
        assert!(looks_like_url("  WWW.EXAMPLE.COM  "));
        assert!(!looks_like_url("example.com"));
        assert!(!looks_like_url("https://example.com with spaces"));
        assert!(!looks_like_url("plain text"));
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com/path?q=1"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("not a url"));
    }
}
