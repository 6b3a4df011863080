//! Single items: `/<permalink>/` and `/<permalink>/edit/`.
//!
//! Checks, in order:
//!
//! 1. configured template, then the legacy template, must match
//! 2. the store must return an item for the captured slug / id
//! 3. legacy matches only serve canonical static pages
//! 4. date captures must equal the item's publish date
//! 5. a trailing segment must be the edit token (-> editor redirect)
//! 6. the path must equal the item's permalink, else redirect to it
//!
//! Static pages reached through the configured template, doubled slashes
//! and missing trailing slashes all fail step 6.

use super::{
    Miss, Outcome, Redirect, RedirectKind, Render, RenderData, ResolveError, Resolver, Snapshot,
};
use crate::core::RequestPath;
use crate::{debug, log};
use crate::route::{PermalinkMatch, PermalinkTemplate, RouteKind};
use crate::store::{DEFAULT_INCLUDE, Item, ItemLookup, ItemStore, SettingKey, SettingsStore};
use crate::view::{ThemeViews, single_view};

impl<S, V> Resolver<S, V>
where
    S: SettingsStore + ItemStore,
    V: ThemeViews,
{
    pub(super) async fn single(
        &self,
        snap: &Snapshot,
        request: &RequestPath,
    ) -> Result<Outcome, ResolveError> {
        let source = self.setting(SettingKey::Permalinks).await?;
        let configured = snap.permalinks.configured(&source)?;

        let Some(matched) = snap.permalinks.resolve_single(&configured, request.as_str()) else {
            return Ok(Outcome::NotFound(Miss::NoMatch));
        };

        let Some(lookup) = lookup_for(&matched) else {
            return Ok(Outcome::NotFound(Miss::ItemAbsent));
        };
        if lookup.is_empty() {
            return Ok(Outcome::NotFound(Miss::NoMatch));
        }

        let found = ItemStore::read(&self.store, lookup)
            .await
            .inspect_err(|err| log!("store"; "item lookup failed: {}", err))?;
        let Some(item) = found.into_iter().next() else {
            return Ok(Outcome::NotFound(Miss::ItemAbsent));
        };

        if let Some(miss) = check_item(&matched, &configured, &item) {
            return Ok(Outcome::NotFound(miss));
        }

        match matched.edit() {
            Some(token) if token == snap.config.routes.edit_token => {
                let location = format!("{}{}", snap.subdir, snap.config.routes.editor_for(item.id));
                debug!("redirect"; "edit {} -> {}", item.slug, location);
                return Ok(Outcome::Redirect(Redirect {
                    location,
                    kind: RedirectKind::Edit,
                }));
            }
            Some(_) => return Ok(Outcome::NotFound(Miss::BadEditSuffix)),
            None => {}
        }

        let canonical = match snap.permalinks.path_for(&configured, &item) {
            Ok(path) => path,
            Err(err) => {
                debug!("permalink"; "no permalink for {}: {}", item.slug, err);
                return Ok(Outcome::NotFound(Miss::NoPermalink));
            }
        };
        if request.as_str() != canonical.as_str() {
            return Ok(snap.redirect(&canonical));
        }

        let theme = self.setting(SettingKey::ActiveTheme).await?;
        Ok(Outcome::Render(Render {
            kind: RouteKind::Single,
            view: single_view(&self.views, &theme, &item),
            data: RenderData::Single { post: item },
        }))
    }
}

/// Store lookup for the captured fields; `None` when the `id` capture is not a number.
fn lookup_for(matched: &PermalinkMatch) -> Option<ItemLookup> {
    let id = match matched.id() {
        Some(raw) => Some(raw.parse::<u64>().ok()?),
        None => None,
    };

    Some(ItemLookup {
        slug: matched.slug().map(str::to_string),
        id,
        include: DEFAULT_INCLUDE,
    })
}

/// Legacy and date checks on the canonical item for the path.
fn check_item(
    matched: &PermalinkMatch,
    configured: &PermalinkTemplate,
    item: &Item,
) -> Option<Miss> {
    if matched.used_legacy {
        return (!item.page).then_some(Miss::NotStaticPage);
    }

    let parts = configured.date_parts();
    if parts.is_empty() {
        return None;
    }

    let expected = item.published().map(|date| date.format_path(parts));
    if expected.as_deref() == Some(matched.date_path(parts).as_str()) {
        None
    } else {
        Some(Miss::DateMismatch)
    }
}
