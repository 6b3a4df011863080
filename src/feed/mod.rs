//! Feed assembly: resolved page of items -> syndication document.
//!
//! # Module Structure
//!
//! ```text
//! feed/
//! ├── rewrite   # src/href absolutization for item bodies
//! └── rss       # RSS 2.0 serialization via the `rss` crate
//! ```
//!
//! Assembly is a pure transform: entries come out in input order, one per
//! item. Per-item work (URL generation, link rewriting) fans out over rayon
//! and is collected back in order.

mod rewrite;
mod rss;

pub use rewrite::absolutize_links;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::route::{GenerateError, PermalinkRegistry, PermalinkTemplate};
use crate::store::Item;
use crate::utils::date::DateTimeUtc;

/// Content type of the serialized feed.
pub const CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("cannot build URL for item `{slug}`: {source}")]
    ItemUrl {
        slug: String,
        #[source]
        source: GenerateError,
    },

    #[error("RSS validation failed: {0}")]
    Invalid(String),
}

/// Channel-level data of one feed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedMetadata {
    pub title: String,
    pub description: String,
    pub generator: String,
    /// Absolute site root, e.g. `https://example.com/blog/`
    pub site_url: String,
    /// Absolute URL of this feed
    pub feed_url: String,
    /// Refresh hint in minutes
    pub ttl: u32,
}

/// One feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub title: String,
    /// Stable non-permalink identifier (the item uuid)
    pub guid: String,
    /// Absolute item URL
    pub url: String,
    pub published: Option<DateTimeUtc>,
    /// Tag names, in item order
    pub categories: Vec<String>,
    pub author: Option<String>,
    /// Body with absolute `src`/`href` references
    pub content: String,
}

/// Assembled feed, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedDocument {
    pub metadata: FeedMetadata,
    pub items: Vec<FeedItem>,
}

impl FeedDocument {
    #[inline]
    pub const fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// Serialize as RSS 2.0 XML.
    pub fn to_xml(&self) -> Result<String, FeedError> {
        rss::render(self)
    }
}

/// Builds feed entries against one site root and one permalink snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FeedAssembler<'a> {
    site_url: &'a Url,
    permalinks: &'a PermalinkRegistry,
    template: &'a PermalinkTemplate,
}

impl<'a> FeedAssembler<'a> {
    pub fn new(
        site_url: &'a Url,
        permalinks: &'a PermalinkRegistry,
        template: &'a PermalinkTemplate,
    ) -> Self {
        Self {
            site_url,
            permalinks,
            template,
        }
    }

    /// Build the document; entries keep the order of `items`.
    pub fn assemble(
        &self,
        metadata: FeedMetadata,
        items: &[Item],
    ) -> Result<FeedDocument, FeedError> {
        let items = items
            .par_iter()
            .map(|item| self.entry(item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeedDocument { metadata, items })
    }

    fn entry(&self, item: &Item) -> Result<FeedItem, FeedError> {
        let path = self
            .permalinks
            .path_for(self.template, item)
            .map_err(|source| FeedError::ItemUrl {
                slug: item.slug.clone(),
                source,
            })?;

        Ok(FeedItem {
            title: item.title.clone(),
            guid: item.uuid.clone(),
            url: self.absolute(path.as_str()),
            published: item.published(),
            categories: item.tags.iter().map(|tag| tag.name.clone()).collect(),
            author: item.author.as_ref().map(|author| author.name.clone()),
            content: absolutize_links(&item.html, self.site_url).into_owned(),
        })
    }

    /// Site-root-relative path -> absolute URL under the site root.
    fn absolute(&self, path: &str) -> String {
        let relative = path.trim_start_matches('/');
        match self.site_url.join(relative) {
            Ok(url) => url.into(),
            Err(_) => format!("{}{relative}", self.site_url),
        }
    }
}
