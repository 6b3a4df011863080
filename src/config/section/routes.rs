//! `[routes]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [routes]
//! tag_base = "tag"                  # /tag/<slug>/
//! page_base = "page"                # /page/<n>/
//! feed_base = "rss"                 # /rss/, /tag/<slug>/rss/
//! legacy_permalink = "/:slug/"      # Static-page fallback grammar
//! edit_token = "edit"               # /<item>/edit/
//! editor_path = "/ghost/editor/"    # Edit redirect target, item id appended
//! ```

use serde::{Deserialize, Serialize};

use crate::route::PermalinkTemplate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Trailing segment that turns an item path into an edit redirect.
    pub edit_token: String,

    /// Editor location; the item id and a trailing slash are appended.
    pub editor_path: String,

    /// Fixed grammar for previously published static pages.
    pub legacy_permalink: String,

    pub tag_base: String,
    pub page_base: String,
    pub feed_base: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            edit_token: "edit".to_string(),
            editor_path: "/ghost/editor/".to_string(),
            legacy_permalink: "/:slug/".to_string(),
            tag_base: "tag".to_string(),
            page_base: "page".to_string(),
            feed_base: "rss".to_string(),
        }
    }
}

impl RoutesConfig {
    /// Editor path for one item: `/ghost/editor/42/`.
    pub fn editor_for(&self, id: u64) -> String {
        let base = self.editor_path.trim_end_matches('/');
        format!("{base}/{id}/")
    }

    pub(crate) fn validate(&self, errors: &mut Vec<String>) {
        for (name, value) in [
            ("routes.tag_base", &self.tag_base),
            ("routes.page_base", &self.page_base),
            ("routes.feed_base", &self.feed_base),
            ("routes.edit_token", &self.edit_token),
        ] {
            if !is_single_segment(value) {
                errors.push(format!("{name} must be one non-empty path segment, got `{value}`"));
            }
        }

        if !self.editor_path.starts_with('/') {
            errors.push(format!(
                "routes.editor_path must start with `/`, got `{}`",
                self.editor_path
            ));
        }

        if let Err(e) = PermalinkTemplate::compile(&self.legacy_permalink) {
            errors.push(format!("routes.legacy_permalink: {e}"));
        }
    }
}

fn is_single_segment(value: &str) -> bool {
    !value.is_empty() && !value.contains(['/', ':', '?', '#']) && value.trim() == value
}
