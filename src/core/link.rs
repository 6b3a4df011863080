//! Link classification utilities.

/// Syntactic classification of links found in item content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// External link with URL scheme (https://, mailto:, data:, etc.)
    External(&'a str),
    /// Protocol-relative link (//cdn.example.com/x.png)
    NetworkPath(&'a str),
    /// Pure fragment/anchor link (#section). Value is anchor without `#`.
    Fragment(&'a str),
    /// Site-root-relative path (/about, /content/images/a.png).
    SiteRoot(&'a str),
    /// Document-relative path (./image.png, ../other, image.png).
    Relative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if is_external_link(link) {
            Self::External(link)
        } else if link.starts_with("//") {
            Self::NetworkPath(link)
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else {
            Self::Relative(link)
        }
    }

    /// Check if the link already carries a scheme and needs no resolution.
    #[inline]
    pub const fn is_absolute(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

/// Check if a link is external (has a URL scheme like http:, mailto:, etc.)
///
/// A valid scheme must have at least 1 character before the colon and only
/// contain ASCII alphanumeric or `+`, `-`, `.`, starting with a letter.
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos].starts_with(|c: char| c.is_ascii_alphabetic())
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
