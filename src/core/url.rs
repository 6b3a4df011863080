//! URL path types for request and canonical paths.
//!
//! - Internal representation: always decoded (human-readable)
//! - Browser boundary: decode on input, encode on output

use std::sync::Arc;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Characters escaped inside a single path segment on output.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%');

/// Decoded request path as it arrived, minus query string and fragment.
///
/// Invariants:
/// - Always decoded (no percent-encoding)
/// - Always starts with `/`
/// - Slashes are preserved as received, so canonicalization can detect extras
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestPath {
    path: Arc<str>,
}

impl RequestPath {
    /// Create from a browser URL path (decode percent-encoding, strip query/fragment).
    pub fn from_browser(encoded: &str) -> Self {
        let path = encoded
            .trim()
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let decoded = percent_decode_str(path)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.to_string());

        let normalized = if decoded.starts_with('/') {
            decoded
        } else {
            format!("/{decoded}")
        };

        Self {
            path: Arc::from(normalized),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Non-empty `/`-separated segments.
    pub fn segments(&self) -> Vec<&str> {
        split_segments(&self.path)
    }
}

impl std::fmt::Display for RequestPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for RequestPath {
    fn from(s: &str) -> Self {
        Self::from_browser(s)
    }
}

/// Decoded canonical page path.
///
/// Invariants:
/// - Always decoded (no percent-encoding)
/// - Always starts and ends with `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlPath(Arc<str>);

impl UrlPath {
    /// Create page URL (with trailing slash). Normalizes leading/trailing slashes.
    pub fn from_page(decoded: &str) -> Self {
        let trimmed = decoded.trim();

        if trimmed.is_empty() || trimmed == "/" {
            return Self(Arc::from("/"));
        }

        let with_leading = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };

        let normalized = if with_leading.ends_with('/') {
            with_leading
        } else {
            format!("{with_leading}/")
        };

        Self(Arc::from(normalized))
    }

    /// Build a page URL from segments: `["tag", "news"]` -> `/tag/news/`.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        if segments.is_empty() {
            return Self(Arc::from("/"));
        }
        let mut path = String::from("/");
        for segment in segments {
            path.push_str(segment.as_ref());
            path.push('/');
        }
        Self(Arc::from(path))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encode for browser (percent-encode each segment).
    pub fn to_encoded(&self) -> String {
        self.0
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Check if this is the site root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.as_ref() == "/"
    }
}

impl std::fmt::Display for UrlPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for UrlPath {
    fn default() -> Self {
        Self::from_page("/")
    }
}

impl AsRef<str> for UrlPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UrlPath {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for UrlPath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for UrlPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UrlPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_page(&s))
    }
}

/// Split a path into its non-empty `/`-separated segments.
#[inline]
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Normalize a mount subdirectory to `/x/y` form (empty for the root mount).
pub fn normalize_subdir(subdir: &str) -> String {
    let segments = split_segments(subdir.trim());
    if segments.is_empty() {
        String::new()
    } else {
        format!("/{}", segments.join("/"))
    }
}
