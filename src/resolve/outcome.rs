//! What a resolution produces.

use serde::Serialize;

use crate::feed::FeedDocument;
use crate::route::RouteKind;
use crate::store::{Item, Pagination, Tag};

/// Result of resolving one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Hand `data` to the rendering surface under `view`.
    Render(Render),
    /// Serve a syndication document.
    Feed(FeedDocument),
    /// Send the client elsewhere.
    Redirect(Redirect),
    /// Continue to the caller's not-found handling.
    NotFound(Miss),
}

impl Outcome {
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    #[inline]
    pub const fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }

    /// Redirect location, if this is a redirect.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect(redirect) => Some(&redirect.location),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Render {
    pub kind: RouteKind,
    pub view: String,
    pub data: RenderData,
}

/// Payload handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RenderData {
    Listing {
        posts: Vec<Item>,
        pagination: Pagination,
    },
    TagListing {
        posts: Vec<Item>,
        pagination: Pagination,
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<Tag>,
    },
    Single {
        post: Item,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedirectKind {
    /// Same resource, canonical URL
    Canonical,
    /// Item editor
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// Site-relative location, subdirectory included
    pub location: String,
    pub kind: RedirectKind,
}

/// Why a path resolved to nothing.
///
/// All reasons look the same to the caller; they differ only in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    /// No grammar matched the path
    NoMatch,
    /// Grammar matched but the store has no such item
    ItemAbsent,
    /// Trailing segment present but not the edit token
    BadEditSuffix,
    /// Slug exists under a different date path
    DateMismatch,
    /// Legacy path reached an item that is not a canonical static page
    NotStaticPage,
    /// Item matched but its own permalink cannot be generated (e.g. undated)
    NoPermalink,
}

impl Miss {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMatch => "no-match",
            Self::ItemAbsent => "item-absent",
            Self::BadEditSuffix => "bad-edit-suffix",
            Self::DateMismatch => "date-mismatch",
            Self::NotStaticPage => "not-static-page",
            Self::NoPermalink => "no-permalink",
        }
    }
}

impl std::fmt::Display for Miss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
