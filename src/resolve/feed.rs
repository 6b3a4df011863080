//! Feeds: `/rss/`, `/rss/N/`, `/tag/x/rss/`, `/tag/x/rss/N/`.

use super::{Outcome, Paginated, ResolveError, Resolver, Snapshot, requested_page};
use crate::core::RequestPath;
use crate::feed::{FeedAssembler, FeedMetadata};
use crate::route::ResolvedRoute;
use crate::store::{BrowseOptions, ItemStore, SettingKey, SettingsStore};
use crate::view::ThemeViews;
use crate::debug;

impl<S, V> Resolver<S, V>
where
    S: SettingsStore + ItemStore,
    V: ThemeViews,
{
    pub(super) async fn feed(
        &self,
        snap: &Snapshot,
        request: &RequestPath,
        route: &ResolvedRoute,
    ) -> Result<Outcome, ResolveError> {
        let tag = route.tag();
        let paged = snap.table.feed(tag);

        let Some(requested) = requested_page(route) else {
            return Ok(snap.redirect(&paged.page(1)));
        };

        // Independent reads; any failure fails the feed
        let (title, description, permalinks) = tokio::try_join!(
            self.setting(SettingKey::Title),
            self.setting(SettingKey::Description),
            self.setting(SettingKey::Permalinks),
        )?;

        // Feeds use the store's page size, not the listing setting
        let options = BrowseOptions::page(requested).with_tag(tag);
        let page = match self.paginate(snap, request, requested, &paged, options).await? {
            Paginated::Page(page) => page,
            Paginated::Redirect(outcome) => return Ok(outcome),
        };

        let (title, feed_path) = match (tag, page.filter_tag()) {
            (Some(_), Some(filter)) => (
                format!("{} - {title}", filter.name),
                snap.table.feed(Some(&filter.slug)).page(1),
            ),
            _ => (title, snap.table.feed(None).page(1)),
        };

        let metadata = FeedMetadata {
            title,
            description,
            generator: snap.config.feed.generator.clone(),
            site_url: snap.site_url.to_string(),
            feed_url: snap.absolute(&feed_path),
            ttl: snap.config.feed.ttl,
        };

        let configured = snap.permalinks.configured(&permalinks)?;
        let assembler = FeedAssembler::new(&snap.site_url, &snap.permalinks, &configured);
        let document = assembler.assemble(metadata, &page.items)?;

        debug!("feed"; "{} with {} items", request, document.items.len());
        Ok(Outcome::Feed(document))
    }
}
