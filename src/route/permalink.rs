//! Item permalink grammars.
//!
//! Two grammars address single items:
//!
//! - the configured template (site setting, e.g. `/:year/:month/:day/:slug/`)
//! - the fixed legacy template (`/:slug/`), kept for static pages
//!
//! Both accept an optional trailing `edit` segment. The configured template
//! always takes precedence over the legacy one.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use super::pattern::{Fields, GenerateError, PathPattern, TemplateError};
use crate::core::UrlPath;
use crate::store::Item;
use crate::utils::date::DatePart;

/// Capture name of the optional trailing edit segment.
pub const EDIT_FIELD: &str = "edit";

/// A permalink pattern plus its edit-suffix variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermalinkTemplate {
    pattern: PathPattern,
    with_edit: PathPattern,
    /// Date captures in template order
    date_parts: Vec<DatePart>,
}

impl PermalinkTemplate {
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        let pattern = PathPattern::compile(template)?;
        let with_edit = pattern.with_optional_suffix(EDIT_FIELD)?;
        let date_parts = pattern.captures().filter_map(DatePart::from_field).collect();

        Ok(Self {
            pattern,
            with_edit,
            date_parts,
        })
    }

    /// Template text as configured.
    #[inline]
    pub fn source(&self) -> &str {
        self.pattern.source()
    }

    #[inline]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Date components the template encodes, in template order.
    #[inline]
    pub fn date_parts(&self) -> &[DatePart] {
        &self.date_parts
    }

    /// Match a path, allowing one trailing edit segment.
    pub fn match_path(&self, path: &str) -> Option<Fields> {
        self.with_edit.match_path(path)
    }

    /// Canonical path of `item` under this template.
    pub fn path_for(&self, item: &Item) -> Result<UrlPath, GenerateError> {
        self.pattern.generate(&item_fields(item))
    }
}

/// Fields an item contributes to permalink generation.
pub fn item_fields(item: &Item) -> Fields {
    let mut fields = Fields::new();
    fields.insert("slug".to_string(), item.slug.clone());
    fields.insert("id".to_string(), item.id.to_string());
    if let Some(published) = item.published() {
        for part in [DatePart::Year, DatePart::Month, DatePart::Day] {
            fields.insert(part.field().to_string(), published.format_part(part));
        }
    }
    fields
}

/// Fields extracted from a single-item path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermalinkMatch {
    pub fields: Fields,
    /// Matched only through the legacy static-page grammar
    pub used_legacy: bool,
}

impl PermalinkMatch {
    pub fn slug(&self) -> Option<&str> {
        self.fields.get("slug").map(String::as_str)
    }

    /// Raw `id` capture, if the template has one.
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").map(String::as_str)
    }

    /// Trailing edit segment, if present.
    pub fn edit(&self) -> Option<&str> {
        self.fields.get(EDIT_FIELD).map(String::as_str)
    }

    /// Date captures joined in template order (`2015/03/02`), with their parts.
    pub fn date_path(&self, parts: &[DatePart]) -> String {
        parts
            .iter()
            .filter_map(|part| self.fields.get(part.field()))
            .cloned()
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Holds the legacy grammar and caches the compiled configured grammar.
///
/// The configured template text comes from the settings store on every
/// request. The compiled form is swapped atomically whenever that text
/// changes, so in-flight requests keep the `Arc` they started with.
#[derive(Debug)]
pub struct PermalinkRegistry {
    legacy: Arc<PermalinkTemplate>,
    configured: ArcSwapOption<PermalinkTemplate>,
}

impl PermalinkRegistry {
    pub fn new(legacy: PermalinkTemplate) -> Self {
        Self {
            legacy: Arc::new(legacy),
            configured: ArcSwapOption::const_empty(),
        }
    }

    #[inline]
    pub fn legacy(&self) -> &PermalinkTemplate {
        &self.legacy
    }

    /// Compiled form of the configured template text.
    pub fn configured(&self, source: &str) -> Result<Arc<PermalinkTemplate>, TemplateError> {
        if let Some(current) = self.configured.load_full()
            && current.source() == source.trim()
        {
            return Ok(current);
        }

        let compiled = Arc::new(PermalinkTemplate::compile(source)?);
        self.configured.store(Some(Arc::clone(&compiled)));
        crate::debug!("permalink"; "compiled template {}", compiled.source());
        Ok(compiled)
    }

    /// Match a single-item path: configured template first, then legacy.
    pub fn resolve_single(
        &self,
        configured: &PermalinkTemplate,
        path: &str,
    ) -> Option<PermalinkMatch> {
        if let Some(fields) = configured.match_path(path) {
            return Some(PermalinkMatch {
                fields,
                used_legacy: false,
            });
        }

        self.legacy.match_path(path).map(|fields| PermalinkMatch {
            fields,
            used_legacy: true,
        })
    }

    /// Canonical path of `item`: static pages use the legacy grammar.
    pub fn path_for(
        &self,
        configured: &PermalinkTemplate,
        item: &Item,
    ) -> Result<UrlPath, GenerateError> {
        if item.page {
            self.legacy.path_for(item)
        } else {
            configured.path_for(item)
        }
    }
}
