//! RSS 2.0 serialization.
//!
//! Channel `<link>` points at the site root; the feed's own URL goes into an
//! `atom:link rel="self"` element.

use rss::extension::atom::{AtomExtension, Link};
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};

use super::{CONTENT_TYPE, FeedDocument, FeedError, FeedItem};
use crate::utils::date::DateTimeUtc;

pub(super) fn render(doc: &FeedDocument) -> Result<String, FeedError> {
    let meta = &doc.metadata;
    let items: Vec<_> = doc.items.iter().map(to_rss_item).collect();

    let self_link = Link {
        href: meta.feed_url.clone(),
        rel: "self".to_string(),
        mime_type: Some(CONTENT_TYPE.split(';').next().unwrap_or_default().to_string()),
        ..Default::default()
    };

    let channel = ChannelBuilder::default()
        .title(meta.title.clone())
        .link(meta.site_url.clone())
        .description(meta.description.clone())
        .generator(Some(meta.generator.clone()))
        .ttl(Some(meta.ttl.to_string()))
        .atom_ext(Some(AtomExtension {
            links: vec![self_link],
        }))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| FeedError::Invalid(e.to_string()))?;
    Ok(channel.to_string())
}

fn to_rss_item(item: &FeedItem) -> rss::Item {
    let categories = item
        .categories
        .iter()
        .map(|name| CategoryBuilder::default().name(name.clone()).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(Some(item.title.clone()))
        .link(Some(item.url.clone()))
        .guid(Some(
            GuidBuilder::default()
                .permalink(false)
                .value(item.guid.clone())
                .build(),
        ))
        .description(Some(item.content.clone()))
        .pub_date(item.published.map(DateTimeUtc::to_rfc2822))
        .categories(categories)
        .author(item.author.clone())
        .build()
}
