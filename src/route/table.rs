//! Fixed route table: which resource kind a request path addresses.

use serde::Serialize;

use super::page::{PageToken, PagedPath};
use super::pattern::{Fields, PathPattern, TemplateError};
use crate::config::RoutesConfig;
use crate::core::{RequestPath, UrlPath};

/// Resource kinds the resolver knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteKind {
    Listing,
    TagListing,
    Single,
    Feed,
}

/// Per-request classification of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub kind: RouteKind,
    pub fields: Fields,
    pub page: PageToken,
}

impl ResolvedRoute {
    /// Tag slug for tag listings and tag feeds.
    pub fn tag(&self) -> Option<&str> {
        self.fields.get("slug").map(String::as_str)
    }
}

/// Compiled grammars for every fixed (non-item) route.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<(RouteKind, PathPattern)>,
    tag_base: String,
    page_base: String,
    feed_base: String,
}

impl RouteTable {
    /// Compile the table from the configured path bases.
    ///
    /// Tried in order; the first match wins. Feeds come before tag listings
    /// so `/tag/x/rss/` is never read as a tag page.
    pub fn new(routes: &RoutesConfig) -> Result<Self, TemplateError> {
        let (tag, page, feed) = (&routes.tag_base, &routes.page_base, &routes.feed_base);
        let table = [
            (RouteKind::Listing, "/".to_string()),
            (RouteKind::Listing, format!("/{page}/:page/")),
            (RouteKind::Feed, format!("/{feed}/")),
            (RouteKind::Feed, format!("/{feed}/:page/")),
            (RouteKind::Feed, format!("/{tag}/:slug/{feed}/")),
            (RouteKind::Feed, format!("/{tag}/:slug/{feed}/:page/")),
            (RouteKind::TagListing, format!("/{tag}/:slug/")),
            (RouteKind::TagListing, format!("/{tag}/:slug/{page}/:page/")),
        ];

        let routes = table
            .into_iter()
            .map(|(kind, template)| PathPattern::compile(&template).map(|p| (kind, p)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            routes,
            tag_base: tag.clone(),
            page_base: page.clone(),
            feed_base: feed.clone(),
        })
    }

    /// Classify a path. Anything not matching a fixed route is a single-item candidate.
    pub fn classify(&self, path: &RequestPath) -> ResolvedRoute {
        let segments = path.segments();
        for (kind, pattern) in &self.routes {
            if let Some(fields) = pattern.match_segments(&segments) {
                let page = PageToken::parse(fields.get("page").map(String::as_str));
                return ResolvedRoute {
                    kind: *kind,
                    fields,
                    page,
                };
            }
        }

        ResolvedRoute {
            kind: RouteKind::Single,
            fields: Fields::new(),
            page: PageToken::Absent,
        }
    }

    /// Canonical pages of the home listing: `/`, `/page/2/`.
    pub fn listing(&self) -> PagedPath {
        PagedPath::new(UrlPath::default(), Some(self.page_base.as_str()))
    }

    /// Canonical pages of a tag listing: `/tag/x/`, `/tag/x/page/2/`.
    pub fn tag_listing(&self, slug: &str) -> PagedPath {
        PagedPath::new(
            UrlPath::from_segments(&[self.tag_base.as_str(), slug]),
            Some(self.page_base.as_str()),
        )
    }

    /// Canonical pages of a feed: `/rss/`, `/rss/2/`, `/tag/x/rss/2/`.
    pub fn feed(&self, tag: Option<&str>) -> PagedPath {
        let base = match tag {
            Some(slug) => UrlPath::from_segments(&[
                self.tag_base.as_str(),
                slug,
                self.feed_base.as_str(),
            ]),
            None => UrlPath::from_segments(&[self.feed_base.as_str()]),
        };
        PagedPath::new(base, None)
    }
}
