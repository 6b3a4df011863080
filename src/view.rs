//! View selection through theme capability probing.
//!
//! Rendering is external. The resolver only decides which view name to hand
//! over, asking a [`ThemeViews`] implementation whether the active theme
//! provides a specialized template.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::store::Item;

/// Fallback view for listings.
pub const INDEX_VIEW: &str = "index";
/// Specialized tag-listing view.
pub const TAG_VIEW: &str = "tag";
/// Fallback view for single items.
pub const POST_VIEW: &str = "post";
/// Generic static-page view.
pub const PAGE_VIEW: &str = "page";

/// Answers "does this theme ship a template named `view`?".
pub trait ThemeViews: Send + Sync {
    fn provides(&self, theme: &str, view: &str) -> bool;
}

/// View for a tag listing: `tag` when the theme has it, else `index`.
pub fn tag_view(views: &impl ThemeViews, theme: &str) -> String {
    if views.provides(theme, TAG_VIEW) {
        TAG_VIEW.to_string()
    } else {
        INDEX_VIEW.to_string()
    }
}

/// View for a single item.
///
/// Page-type items try `page-<slug>` then `page`; everything else is `post`.
pub fn single_view(views: &impl ThemeViews, theme: &str, item: &Item) -> String {
    if item.page {
        let specific = format!("{PAGE_VIEW}-{}", item.slug);
        if views.provides(theme, &specific) {
            return specific;
        }
        if views.provides(theme, PAGE_VIEW) {
            return PAGE_VIEW.to_string();
        }
    }
    POST_VIEW.to_string()
}

/// In-memory registry of installed themes and their view names.
#[derive(Debug, Clone, Default)]
pub struct ThemeCatalog {
    themes: FxHashMap<String, FxHashSet<String>>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a theme, replacing any previous entry with the same name.
    pub fn with_theme<I, S>(mut self, name: impl Into<String>, views: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.themes
            .insert(name.into(), views.into_iter().map(Into::into).collect());
        self
    }

    pub fn from_map(themes: BTreeMap<String, Vec<String>>) -> Self {
        themes
            .into_iter()
            .fold(Self::new(), |catalog, (name, views)| {
                catalog.with_theme(name, views)
            })
    }
}

impl ThemeViews for ThemeCatalog {
    fn provides(&self, theme: &str, view: &str) -> bool {
        self.themes
            .get(theme)
            .is_some_and(|views| views.contains(view))
    }
}
