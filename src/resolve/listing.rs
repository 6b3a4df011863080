//! Home listing (`/`, `/page/N/`) and tag listing (`/tag/x/`, `/tag/x/page/N/`).

use super::{
    Outcome, Paginated, Render, RenderData, ResolveError, Resolver, Snapshot, requested_page,
};
use crate::core::RequestPath;
use crate::route::{ResolvedRoute, RouteKind};
use crate::store::{BrowseOptions, ItemStore, SettingKey, SettingsStore};
use crate::view::{INDEX_VIEW, ThemeViews, tag_view};

impl<S, V> Resolver<S, V>
where
    S: SettingsStore + ItemStore,
    V: ThemeViews,
{
    pub(super) async fn listing(
        &self,
        snap: &Snapshot,
        request: &RequestPath,
        route: &ResolvedRoute,
    ) -> Result<Outcome, ResolveError> {
        let tag = route.tag();
        let paged = match tag {
            Some(slug) => snap.table.tag_listing(slug),
            None => snap.table.listing(),
        };

        let Some(requested) = requested_page(route) else {
            return Ok(snap.redirect(&paged.page(1)));
        };

        let limit = self.page_size().await?;
        let options = BrowseOptions::page(requested).with_limit(limit).with_tag(tag);

        let page = match self.paginate(snap, request, requested, &paged, options).await? {
            Paginated::Page(page) => page,
            Paginated::Redirect(outcome) => return Ok(outcome),
        };

        let render = if tag.is_some() {
            let theme = self.setting(SettingKey::ActiveTheme).await?;
            let filter_tag = page.filter_tag().cloned();
            Render {
                kind: RouteKind::TagListing,
                view: tag_view(&self.views, &theme),
                data: RenderData::TagListing {
                    posts: page.items,
                    pagination: page.meta.pagination,
                    tag: filter_tag,
                },
            }
        } else {
            Render {
                kind: RouteKind::Listing,
                view: INDEX_VIEW.to_string(),
                data: RenderData::Listing {
                    posts: page.items,
                    pagination: page.meta.pagination,
                },
            }
        };

        Ok(Outcome::Render(render))
    }
}
