// src/models/page.rs

//! Page identity and capture types.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Canonical identity of a page.
///
/// Wraps an absolute http(s) URL in normalized form: scheme and host
/// lowercased, default port dropped, fragment stripped, trailing slash
/// trimmed from non-root paths. Two `PageUrl`s are equal iff their
/// normalized forms match, so the type is usable as a set/map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageUrl(Url);

impl PageUrl {
    /// Parse and normalize an absolute URL.
    ///
    /// Rejects anything that is not http or https.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut url = Url::parse(raw.trim())?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "unsupported scheme '{}' in {}",
                url.scheme(),
                raw.trim()
            )));
        }

        url.set_fragment(None);

        let trimmed_path = {
            let path = url.path();
            if path.len() > 1 && path.ends_with('/') {
                Some(path.trim_end_matches('/').to_string())
            } else {
                None
            }
        };
        if let Some(path) = trimmed_path {
            if path.is_empty() {
                url.set_path("/");
            } else {
                url.set_path(&path);
            }
        }

        Ok(Self(url))
    }

    /// Resolve a raw href against this page and normalize the result.
    pub fn join(&self, href: &str) -> Result<Self> {
        let resolved = self.0.join(href.trim())?;
        Self::parse(resolved.as_str())
    }

    /// Host of the URL. Always present for http(s) URLs.
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// Path component of the URL.
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Whether both URLs point at the same host.
    pub fn same_site(&self, other: &PageUrl) -> bool {
        self.host() == other.host()
    }

    /// The normalized string form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for PageUrl {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PageUrl> for String {
    fn from(url: PageUrl) -> Self {
        String::from(url.0)
    }
}

/// The immutable result of rendering one page.
///
/// Serialized form uses camelCase names, matching the document shape sent
/// to the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCapture {
    /// Normalized page URL; the capture's identity
    pub url: PageUrl,

    /// Page title, empty if the document had none
    pub title: String,

    /// Visible text content of the rendered page
    pub text_content: String,
}

impl PageCapture {
    /// Create a capture for a rendered page.
    pub fn new(url: PageUrl, title: impl Into<String>, text_content: impl Into<String>) -> Self {
        Self {
            url,
            title: title.into(),
            text_content: text_content.into(),
        }
    }

    /// Stable identifier under which the capture is indexed.
    pub fn id(&self) -> &str {
        self.url.as_str()
    }
}

// Two captures of the same URL are the same entity even if their content
// differs between renders.
impl PartialEq for PageCapture {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for PageCapture {}

impl Hash for PageCapture {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercases_host() {
        let url = PageUrl::parse("HTTPS://Example.COM/Path").unwrap();
        assert_eq!(url.as_str(), "https://example.com/Path");
    }

    #[test]
    fn test_parse_strips_fragment() {
        let url = PageUrl::parse("https://example.com/page#section-2").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_parse_drops_default_port() {
        let http = PageUrl::parse("http://example.com:80/a").unwrap();
        let https = PageUrl::parse("https://example.com:443/a").unwrap();
        assert_eq!(http.as_str(), "http://example.com/a");
        assert_eq!(https.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_parse_keeps_explicit_port() {
        let url = PageUrl::parse("http://example.com:8080/a").unwrap();
        assert_eq!(url.as_str(), "http://example.com:8080/a");
    }

    #[test]
    fn test_parse_trims_trailing_slash() {
        let url = PageUrl::parse("https://example.com/a/b/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a/b");
    }

    #[test]
    fn test_parse_keeps_root_slash() {
        let url = PageUrl::parse("https://example.com/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");

        let bare = PageUrl::parse("https://example.com").unwrap();
        assert_eq!(bare.as_str(), "https://example.com/");
    }

    #[test]
    fn test_normalized_forms_compare_equal() {
        let a = PageUrl::parse("https://Example.com/a/#top").unwrap();
        let b = PageUrl::parse("https://example.com/a").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_non_http_schemes() {
        assert!(PageUrl::parse("ftp://example.com/file").is_err());
        assert!(PageUrl::parse("mailto:someone@example.com").is_err());
        assert!(PageUrl::parse("javascript:void(0)").is_err());
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(PageUrl::parse("/a/b").is_err());
    }

    #[test]
    fn test_join_resolves_relative_href() {
        let base = PageUrl::parse("https://example.com/docs/intro").unwrap();
        let joined = base.join("../about/").unwrap();
        assert_eq!(joined.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_join_fragment_only_returns_base() {
        let base = PageUrl::parse("https://example.com/page").unwrap();
        let joined = base.join("#top").unwrap();
        assert_eq!(joined, base);
    }

    #[test]
    fn test_same_site() {
        let a = PageUrl::parse("https://example.com/a").unwrap();
        let b = PageUrl::parse("http://example.com/b").unwrap();
        let other = PageUrl::parse("https://other.org/a").unwrap();
        assert!(a.same_site(&b));
        assert!(!a.same_site(&other));
    }

    #[test]
    fn test_serde_round_trip() {
        let url = PageUrl::parse("https://Example.com/a/").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, "\"https://example.com/a\"");

        let back: PageUrl = serde_json::from_str(&json).unwrap();
        assert_eq!(back, url);
    }

    #[test]
    fn test_capture_identity_is_url_only() {
        let url = PageUrl::parse("https://example.com/a").unwrap();
        let first = PageCapture::new(url.clone(), "Title", "old text");
        let second = PageCapture::new(url, "Other title", "new text");
        assert_eq!(first, second);

        let mut set = std::collections::HashSet::new();
        set.insert(first);
        assert!(!set.insert(second));
    }

    #[test]
    fn test_capture_serializes_camel_case() {
        let capture = PageCapture::new(
            PageUrl::parse("https://example.com/a").unwrap(),
            "Title",
            "Body text",
        );
        let json = serde_json::to_value(&capture).unwrap();
        assert_eq!(json["url"], "https://example.com/a");
        assert_eq!(json["textContent"], "Body text");
    }
}
