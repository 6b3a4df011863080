//! In-memory settings and item store.
//!
//! Backs the CLI (loaded from a TOML fixture) and the resolver tests.
//! Supports failure injection so error propagation can be exercised.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{
    BrowseOptions, DEFAULT_PAGE_SIZE, Filters, Item, ItemLookup, ItemStore, Page, PageMeta,
    Pagination, SettingKey, SettingsStore, StoreError, StoreResult,
};

/// Serialized form of a site: settings, installed theme views, and items in
/// canonical order.
///
/// ```toml
/// [settings]
/// title = "My Blog"
/// permalinks = "/:year/:month/:day/:slug/"
/// activeTheme = "casper"
///
/// [themes]
/// casper = ["index", "post", "tag", "page"]
///
/// [[items]]
/// id = 1
/// uuid = "6f2e..."
/// slug = "welcome"
/// title = "Welcome"
/// published_at = "2015-03-02T10:00:00Z"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteFixture {
    pub settings: BTreeMap<String, String>,
    /// Theme name -> view names it provides
    pub themes: BTreeMap<String, Vec<String>>,
    pub items: Vec<Item>,
}

impl SiteFixture {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Which store operation an injected failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Op {
    Browse,
    Read,
    Setting(SettingKey),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RwLock<FxHashMap<&'static str, String>>,
    /// Items in canonical order (earlier entries win same-slug lookups).
    items: RwLock<Vec<Item>>,
    failures: RwLock<FxHashMap<Op, StoreError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: SiteFixture) -> Self {
        let store = Self::new();
        for (key, value) in fixture.settings {
            if let Some(key) = setting_key(&key) {
                store.set(key, value);
            }
        }
        for item in fixture.items {
            store.insert(item);
        }
        store
    }

    pub fn set(&self, key: SettingKey, value: impl Into<String>) {
        self.settings.write().insert(key.as_str(), value.into());
    }

    pub fn unset(&self, key: SettingKey) {
        self.settings.write().remove(key.as_str());
    }

    pub fn insert(&self, item: Item) {
        self.items.write().push(item);
    }

    /// Make every `browse` call fail with `error`.
    pub fn fail_browse(&self, error: StoreError) {
        self.failures.write().insert(Op::Browse, error);
    }

    /// Make every `read` call fail with `error`.
    pub fn fail_read(&self, error: StoreError) {
        self.failures.write().insert(Op::Read, error);
    }

    /// Make reads of one setting fail with `error`.
    pub fn fail_setting(&self, key: SettingKey, error: StoreError) {
        self.failures.write().insert(Op::Setting(key), error);
    }

    fn injected(&self, op: Op) -> StoreResult<()> {
        match self.failures.read().get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn browse_sync(&self, options: &BrowseOptions) -> StoreResult<Page<Item>> {
        self.injected(Op::Browse)?;

        if options.page == 0 {
            return Err(StoreError::bad_request("page must be a positive integer"));
        }

        let items = self.items.read();
        let tag = options
            .tag
            .as_deref()
            .and_then(|slug| {
                items
                    .iter()
                    .flat_map(|item| &item.tags)
                    .find(|tag| tag.slug == slug)
            })
            .cloned();

        let mut matching: Vec<&Item> = items
            .iter()
            .filter(|item| !item.page)
            .filter(|item| match options.tag.as_deref() {
                Some(slug) => item.tags.iter().any(|tag| tag.slug == slug),
                None => true,
            })
            .collect();

        // Newest first; RFC 3339 strings sort chronologically
        matching.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let limit = options.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_PAGE_SIZE);
        let total = u32::try_from(matching.len()).unwrap_or(u32::MAX);
        let pagination = Pagination::compute(options.page, limit, total);

        let start = (options.page as usize - 1).saturating_mul(limit as usize);
        let page_items = matching
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(Page {
            items: page_items,
            meta: PageMeta {
                pagination,
                filters: Filters {
                    tags: tag.map(|tag| vec![tag]),
                },
            },
        })
    }

    fn read_sync(&self, lookup: &ItemLookup) -> StoreResult<Vec<Item>> {
        self.injected(Op::Read)?;

        if lookup.is_empty() {
            return Err(StoreError::bad_request("lookup requires a slug or an id"));
        }

        Ok(self
            .items
            .read()
            .iter()
            .filter(|item| lookup.slug.as_ref().is_none_or(|slug| &item.slug == slug))
            .filter(|item| lookup.id.is_none_or(|id| item.id == id))
            .cloned()
            .collect())
    }
}

fn setting_key(name: &str) -> Option<SettingKey> {
    [
        SettingKey::PostsPerPage,
        SettingKey::Permalinks,
        SettingKey::ActiveTheme,
        SettingKey::Title,
        SettingKey::Description,
    ]
    .into_iter()
    .find(|key| key.as_str() == name)
}

impl SettingsStore for MemoryStore {
    async fn read(&self, key: SettingKey) -> StoreResult<String> {
        self.injected(Op::Setting(key))?;
        self.settings
            .read()
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| StoreError::not_found(key))
    }
}

impl ItemStore for MemoryStore {
    async fn browse(&self, options: BrowseOptions) -> StoreResult<Page<Item>> {
        self.browse_sync(&options)
    }

    async fn read(&self, lookup: ItemLookup) -> StoreResult<Vec<Item>> {
        self.read_sync(&lookup)
    }
}
