//! Page-number tokens and pagination canonicalization.
//!
//! Rules shared by every paginated resource:
//!
//! - no page segment means page 1
//! - page 1 never carries an explicit page segment
//! - malformed, zero or negative tokens redirect to the unsuffixed URL
//! - pages past the end redirect to the last page

use crate::core::UrlPath;

/// Parsed page-number segment of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    /// No page segment in the path
    Absent,
    /// Positive integer; `padded` when written with leading zeros (`02`)
    Number { value: u32, padded: bool },
    /// Empty, non-numeric, zero or negative token
    Invalid,
}

impl PageToken {
    /// Parse the raw page segment, if any.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Absent;
        };

        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Self::Invalid;
        }

        if raw.bytes().all(|b| b == b'0') {
            return Self::Invalid;
        }

        // All digits and nonzero: anything too large for u32 is still past the end
        Self::Number {
            value: raw.parse::<u32>().unwrap_or(u32::MAX),
            padded: raw.starts_with('0'),
        }
    }

    /// Check if the path carried a page segment at all.
    #[inline]
    pub const fn is_explicit(self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Check if the segment (if any) was a well-formed page number.
    #[inline]
    pub const fn is_well_formed(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Requested page number; malformed tokens count as page 1.
    #[inline]
    pub const fn page(self) -> u32 {
        match self {
            Self::Number { value, .. } => value,
            Self::Absent | Self::Invalid => 1,
        }
    }

    /// Decide from the token alone whether the request may proceed.
    ///
    /// Returns the page to fetch, or the page whose canonical URL the
    /// request must be redirected to.
    pub const fn check(self) -> TokenCheck {
        match self {
            Self::Absent => TokenCheck::Proceed(1),
            Self::Invalid => TokenCheck::Redirect(1),
            Self::Number { value, padded } => {
                if padded || !is_canonical_token(value, true) {
                    TokenCheck::Redirect(value)
                } else {
                    TokenCheck::Proceed(value)
                }
            }
        }
    }
}

/// Outcome of [`PageToken::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    Proceed(u32),
    Redirect(u32),
}

/// Page 1 must never be addressed with an explicit page segment.
#[inline]
pub const fn is_canonical_token(page: u32, explicit: bool) -> bool {
    !(explicit && page == 1)
}

/// Outcome of [`clamp_or_reject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeCheck {
    InRange,
    Beyond { last: u32 },
}

/// Compare a requested page against the total page count.
///
/// A store reporting zero pages still has an (empty) first page.
#[inline]
pub fn clamp_or_reject(requested: u32, total_pages: u32) -> RangeCheck {
    let last = total_pages.max(1);
    if requested > last {
        RangeCheck::Beyond { last }
    } else {
        RangeCheck::InRange
    }
}

/// Canonical URLs for the pages of one paginated resource.
///
/// ```text
/// base=/tag/news/, marker=Some("page")  ->  /tag/news/, /tag/news/page/2/
/// base=/rss/,      marker=None          ->  /rss/,      /rss/2/
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedPath {
    base: UrlPath,
    marker: Option<String>,
}

impl PagedPath {
    pub fn new(base: UrlPath, marker: Option<&str>) -> Self {
        Self {
            base,
            marker: marker.map(str::to_string),
        }
    }

    #[inline]
    pub fn base(&self) -> &UrlPath {
        &self.base
    }

    /// Canonical path for `page` (page 1 has no suffix).
    pub fn page(&self, page: u32) -> UrlPath {
        if page <= 1 {
            return self.base.clone();
        }
        let mut path = self.base.as_str().to_string();
        if let Some(marker) = &self.marker {
            path.push_str(marker);
            path.push('/');
        }
        path.push_str(&page.to_string());
        path.push('/');
        UrlPath::from_page(&path)
    }
}
