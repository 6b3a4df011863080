//! Request path -> resource resolution.
//!
//! # Module Structure
//!
//! ```text
//! resolve/
//! ├── listing   # home and tag listings
//! ├── single    # single items (configured + legacy permalinks)
//! ├── feed      # RSS feeds, optionally tag-filtered
//! ├── outcome   # Outcome, Render, Redirect, Miss
//! └── error     # ResolveError
//! ```
//!
//! # Flow
//!
//! ```text
//! path ─► RouteTable::classify ─► listing | tag | feed | single
//!                                    │
//!                   page token / permalink match / store calls
//!                                    │
//!                    Render | Feed | Redirect | NotFound | Err
//! ```
//!
//! Every resolution loads one [`Snapshot`] at entry and uses it throughout,
//! so a concurrent [`Resolver::reload`] never mixes two configurations
//! inside one request.

mod error;
mod feed;
mod listing;
mod outcome;
mod single;

#[cfg(test)]
mod tests;

pub use error::ResolveError;
pub use outcome::{Miss, Outcome, Redirect, RedirectKind, Render, RenderData};

use std::sync::Arc;

use arc_swap::ArcSwap;
use url::Url;

use crate::config::{ConfigError, ResolverConfig};
use crate::core::{RequestPath, UrlPath};
use crate::route::{
    PagedPath, PermalinkRegistry, PermalinkTemplate, RangeCheck, ResolvedRoute, RouteKind,
    RouteTable, TokenCheck, clamp_or_reject,
};
use crate::store::{BrowseOptions, Item, ItemStore, Page, SettingKey, SettingsStore, StoreResult};
use crate::view::ThemeViews;
use crate::{debug, log};

// ============================================================================
// Snapshot
// ============================================================================

/// Everything compiled from one configuration.
#[derive(Debug)]
pub struct Snapshot {
    pub config: ResolverConfig,
    pub table: RouteTable,
    pub permalinks: PermalinkRegistry,
    /// Absolute site root, subdirectory included, ending in `/`
    pub site_url: Url,
    /// `/x` or `""`
    pub subdir: String,
}

impl Snapshot {
    pub fn build(config: ResolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let table = RouteTable::new(&config.routes)?;
        let legacy = PermalinkTemplate::compile(&config.routes.legacy_permalink)?;
        let site_url = config.site.root_url()?;
        let subdir = config.site.subdir();

        Ok(Self {
            table,
            permalinks: PermalinkRegistry::new(legacy),
            site_url,
            subdir,
            config,
        })
    }

    /// Absolute URL of a site path.
    pub fn absolute(&self, path: &UrlPath) -> String {
        let relative = path.as_str().trim_start_matches('/');
        match self.site_url.join(relative) {
            Ok(url) => url.into(),
            Err(_) => format!("{}{relative}", self.site_url),
        }
    }

    /// Canonical redirect to a site path, mounted under the subdirectory.
    fn redirect(&self, path: &UrlPath) -> Outcome {
        let location = format!("{}{}", self.subdir, path.to_encoded());
        debug!("redirect"; "{}", location);
        Outcome::Redirect(Redirect {
            location,
            kind: RedirectKind::Canonical,
        })
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves request paths against a store and a theme catalog.
///
/// `S` serves both settings and items. Paths given to [`Resolver::resolve`]
/// are relative to the mount point; redirect locations include the
/// configured subdirectory.
pub struct Resolver<S, V> {
    store: S,
    views: V,
    snapshot: ArcSwap<Snapshot>,
}

impl<S, V> Resolver<S, V>
where
    S: SettingsStore + ItemStore,
    V: ThemeViews,
{
    pub fn new(config: ResolverConfig, store: S, views: V) -> Result<Self, ConfigError> {
        let snapshot = Snapshot::build(config)?;
        Ok(Self {
            store,
            views,
            snapshot: ArcSwap::from_pointee(snapshot),
        })
    }

    /// Current configuration snapshot.
    #[inline]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the configuration. In-flight resolutions finish on the old one.
    pub fn reload(&self, config: ResolverConfig) -> Result<(), ConfigError> {
        let snapshot = Snapshot::build(config)?;
        self.snapshot.store(Arc::new(snapshot));
        log!("config"; "reloaded");
        Ok(())
    }

    /// Resolve one request path.
    pub async fn resolve(&self, path: &str) -> Result<Outcome, ResolveError> {
        let snap = self.snapshot.load_full();
        let request = RequestPath::from_browser(path);
        let route = snap.table.classify(&request);

        let result = match route.kind {
            RouteKind::Listing | RouteKind::TagListing => {
                self.listing(&snap, &request, &route).await
            }
            RouteKind::Feed => self.feed(&snap, &request, &route).await,
            RouteKind::Single => self.single(&snap, &request).await,
        };

        match &result {
            Ok(Outcome::NotFound(miss)) => debug!("miss"; "{} ({})", request, miss),
            Ok(_) => {}
            Err(err) => log!("error"; "{}: {}", request, err),
        }
        result
    }

    // ------------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------------

    async fn setting(&self, key: SettingKey) -> StoreResult<String> {
        SettingsStore::read(&self.store, key)
            .await
            .inspect_err(|err| log!("store"; "reading {} failed: {}", key, err))
    }

    async fn browse(&self, options: BrowseOptions) -> StoreResult<Page<Item>> {
        self.store
            .browse(options)
            .await
            .inspect_err(|err| log!("store"; "browse failed: {}", err))
    }

    /// Configured page size; unusable values fall back to the store default.
    async fn page_size(&self) -> StoreResult<Option<u32>> {
        let raw = self.setting(SettingKey::PostsPerPage).await?;
        Ok(parse_page_size(&raw))
    }

    /// Fetch `requested` and apply the range and canonical-form checks.
    ///
    /// ```text
    /// beyond last page            ->  redirect to last page
    /// in range, non-canonical     ->  redirect to canonical form
    /// in range, canonical         ->  Page
    /// ```
    ///
    /// Malformed tokens and explicit page 1 are handled by the caller through
    /// [`requested_page`], before anything is fetched.
    async fn paginate(
        &self,
        snap: &Snapshot,
        request: &RequestPath,
        requested: u32,
        paged: &PagedPath,
        options: BrowseOptions,
    ) -> Result<Paginated, ResolveError> {
        let page = self.browse(BrowseOptions { page: requested, ..options }).await?;

        if let RangeCheck::Beyond { last } =
            clamp_or_reject(requested, page.meta.pagination.pages)
        {
            return Ok(Paginated::Redirect(snap.redirect(&paged.page(last))));
        }

        let canonical = paged.page(requested);
        if request.as_str() != canonical.as_str() {
            return Ok(Paginated::Redirect(snap.redirect(&canonical)));
        }

        Ok(Paginated::Page(page))
    }
}

/// Page number to fetch, or `None` when the token must redirect to page 1.
///
/// Padded tokens (`02`) still yield their value; the canonical-form check in
/// [`Resolver::paginate`] redirects them once the range is known.
fn requested_page(route: &ResolvedRoute) -> Option<u32> {
    match route.page.check() {
        TokenCheck::Redirect(1) => None,
        TokenCheck::Proceed(page) | TokenCheck::Redirect(page) => Some(page),
    }
}

/// Result of [`Resolver::paginate`].
enum Paginated {
    Page(Page<Item>),
    Redirect(Outcome),
}

/// Leading-integer parse of the page-size setting; only positive values count.
///
/// `"10"` and `"10 per page"` give 10; `"abc"`, `"0"` and `"-5"` give `None`.
pub fn parse_page_size(raw: &str) -> Option<u32> {
    let raw = raw.trim_start();
    let digits = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(raw, |(end, _)| &raw[..end]);

    digits.parse::<u32>().ok().filter(|&size| size > 0)
}
