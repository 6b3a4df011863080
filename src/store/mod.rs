//! Data collaborators consumed by the resolver.
//!
//! The resolver never owns content; it asks two asynchronous stores:
//!
//! - [`SettingsStore`]: string-valued site settings
//! - [`ItemStore`]: paginated browsing and single-item lookup
//!
//! [`MemoryStore`] implements both and backs the CLI and the tests.

mod memory;

pub use memory::{MemoryStore, SiteFixture};

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::date::DateTimeUtc;

/// Page size the item store applies when the caller gives no usable limit.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Relations requested on every item fetch.
pub const DEFAULT_INCLUDE: &str = "author,tags,fields";

// ============================================================================
// Errors
// ============================================================================

/// Failure reported by a backing store, tagged with its status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {status})")]
pub struct StoreError {
    pub status: u16,
    pub message: String,
}

impl StoreError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::new(404, format!("{what} not found"))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// Settings
// ============================================================================

/// Setting keys read by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// String-encoded integer page size
    PostsPerPage,
    /// Item permalink template
    Permalinks,
    /// Active theme name
    ActiveTheme,
    Title,
    Description,
}

impl SettingKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PostsPerPage => "postsPerPage",
            Self::Permalinks => "permalinks",
            Self::ActiveTheme => "activeTheme",
            Self::Title => "title",
            Self::Description => "description",
        }
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only access to site settings.
pub trait SettingsStore: Send + Sync {
    /// Read one setting; absent keys fail with status 404.
    fn read(&self, key: SettingKey) -> impl Future<Output = StoreResult<String>> + Send;
}

// ============================================================================
// Items
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// A content item (post or static page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub uuid: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub html: String,
    /// Behaves as a standalone static page
    #[serde(default)]
    pub page: bool,
    /// Publish timestamp (`YYYY-MM-DD` or RFC 3339 with any UTC offset)
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub author: Option<Author>,
}

impl Item {
    /// Parsed publish timestamp, if present and well-formed.
    pub fn published(&self) -> Option<DateTimeUtc> {
        self.published_at.as_deref().and_then(DateTimeUtc::parse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub pages: u32,
    pub total: u32,
    pub next: Option<u32>,
    pub prev: Option<u32>,
}

impl Pagination {
    /// Compute pagination metadata for `total` items.
    pub fn compute(page: u32, limit: u32, total: u32) -> Self {
        let limit = limit.max(1);
        let pages = total.div_ceil(limit);
        Self {
            page,
            limit,
            pages,
            total,
            next: (page < pages).then(|| page + 1),
            prev: (page > 1).then(|| page - 1),
        }
    }
}

/// Filters that were active for a browse call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub pagination: Pagination,
    #[serde(default)]
    pub filters: Filters,
}

/// One page of a browse result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// First tag among the active filters.
    pub fn filter_tag(&self) -> Option<&Tag> {
        self.meta.filters.tags.as_ref().and_then(|tags| tags.first())
    }
}

/// Options for [`ItemStore::browse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseOptions {
    pub page: u32,
    /// `None` lets the store apply [`DEFAULT_PAGE_SIZE`]
    pub limit: Option<u32>,
    pub tag: Option<String>,
    pub include: &'static str,
}

impl BrowseOptions {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            limit: None,
            tag: None,
            include: DEFAULT_INCLUDE,
        }
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_tag(mut self, tag: Option<&str>) -> Self {
        self.tag = tag.map(str::to_string);
        self
    }
}

/// Identifying fields for [`ItemStore::read`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemLookup {
    pub slug: Option<String>,
    pub id: Option<u64>,
    pub include: &'static str,
}

impl ItemLookup {
    pub fn is_empty(&self) -> bool {
        self.slug.is_none() && self.id.is_none()
    }
}

/// Read access to content items.
pub trait ItemStore: Send + Sync {
    /// Browse one page of published items, newest first.
    fn browse(&self, options: BrowseOptions)
    -> impl Future<Output = StoreResult<Page<Item>>> + Send;

    /// Look up items by slug and/or id; the first entry is the canonical one.
    fn read(&self, lookup: ItemLookup) -> impl Future<Output = StoreResult<Vec<Item>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_compute() {
        let p = Pagination::compute(1, 5, 12);
        assert_eq!(p.pages, 3);
        assert_eq!(p.next, Some(2));
        assert_eq!(p.prev, None);

        let p = Pagination::compute(3, 5, 12);
        assert_eq!(p.next, None);
        assert_eq!(p.prev, Some(2));

        let p = Pagination::compute(1, 5, 0);
        assert_eq!(p.pages, 0);
        assert_eq!(p.next, None);
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::not_found(SettingKey::Permalinks);
        assert_eq!(err.status, 404);
        assert_eq!(err.to_string(), "permalinks not found (status 404)");
        assert_eq!(StoreError::bad_request("bad").status, 400);
    }

    #[test]
    fn test_item_published() {
        let item = Item {
            id: 1,
            uuid: "u".into(),
            slug: "s".into(),
            title: "t".into(),
            html: String::new(),
            page: false,
            published_at: Some("2015-03-02T10:00:00Z".into()),
            tags: vec![],
            author: None,
        };
        assert_eq!(item.published(), Some(DateTimeUtc::new(2015, 3, 2, 10, 0, 0)));
    }
}
