use super::*;
use crate::store::{Author, MemoryStore, Pagination, StoreError, Tag};
use crate::view::ThemeCatalog;

type TestResolver = Resolver<MemoryStore, ThemeCatalog>;

fn news() -> Tag {
    Tag {
        name: "News".into(),
        slug: "news".into(),
    }
}

fn post(id: u64, slug: &str, date: &str, tagged: bool) -> Item {
    Item {
        id,
        uuid: format!("uuid-{id}"),
        slug: slug.into(),
        title: slug.into(),
        html: r#"<p><img src="/img/a.png"> <a href="https://x.org/">x</a></p>"#.into(),
        page: false,
        published_at: Some(date.into()),
        tags: if tagged { vec![news()] } else { vec![] },
        author: Some(Author {
            name: "Ada".into(),
            slug: None,
        }),
    }
}

fn static_page(id: u64, slug: &str) -> Item {
    Item {
        page: true,
        ..post(id, slug, "2014-01-01", false)
    }
}

fn store() -> MemoryStore {
    let store = MemoryStore::new();
    store.set(SettingKey::PostsPerPage, "2");
    store.set(SettingKey::Permalinks, "/:year/:month/:day/:slug/");
    store.set(SettingKey::ActiveTheme, "casper");
    store.set(SettingKey::Title, "Blog");
    store.set(SettingKey::Description, "Words");

    store.insert(post(1, "my-post", "2015-03-02T10:00:00Z", true));
    store.insert(post(2, "second", "2015-04-01", false));
    store.insert(post(3, "third", "2015-05-01", true));
    store.insert(post(4, "fourth", "2015-06-01", false));
    store.insert(post(5, "fifth", "2015-07-01", true));
    store.insert(static_page(6, "about"));
    store
}

fn catalog() -> ThemeCatalog {
    ThemeCatalog::new()
        .with_theme("casper", ["index", "post", "tag", "page", "page-about"])
        .with_theme("bare", ["index", "post"])
}

fn resolver_with(config: ResolverConfig, store: MemoryStore) -> TestResolver {
    Resolver::new(config, store, catalog()).unwrap()
}

fn resolver() -> TestResolver {
    resolver_with(ResolverConfig::default(), store())
}

async fn resolve(resolver: &TestResolver, path: &str) -> Outcome {
    resolver.resolve(path).await.unwrap()
}

#[track_caller]
fn location(outcome: &Outcome) -> &str {
    match outcome.location() {
        Some(location) => location,
        None => panic!("expected redirect, got {outcome:?}"),
    }
}

#[track_caller]
fn rendered(outcome: Outcome) -> Render {
    match outcome {
        Outcome::Render(render) => render,
        other => panic!("expected render, got {other:?}"),
    }
}

fn slugs(data: &RenderData) -> Vec<&str> {
    match data {
        RenderData::Listing { posts, .. } | RenderData::TagListing { posts, .. } => {
            posts.iter().map(|p| p.slug.as_str()).collect()
        }
        RenderData::Single { post } => vec![post.slug.as_str()],
    }
}

fn pagination(data: &RenderData) -> Pagination {
    match data {
        RenderData::Listing { pagination, .. } | RenderData::TagListing { pagination, .. } => {
            *pagination
        }
        RenderData::Single { .. } => panic!("single items have no pagination"),
    }
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_home_listing() {
    let resolver = resolver();
    let render = rendered(resolve(&resolver, "/").await);
    assert_eq!(render.kind, RouteKind::Listing);
    assert_eq!(render.view, "index");
    assert_eq!(slugs(&render.data), ["fifth", "fourth"]);
    assert_eq!(pagination(&render.data).pages, 3);

    let render = rendered(resolve(&resolver, "/page/3/").await);
    assert_eq!(slugs(&render.data), ["my-post"]);
}

#[tokio::test]
async fn test_page_number_policy() {
    let resolver = resolver();
    // 5 posts, 2 per page
    for p in 0..=6 {
        let outcome = resolve(&resolver, &format!("/page/{p}/")).await;
        match p {
            0 | 1 => assert_eq!(location(&outcome), "/", "page {p}"),
            2 | 3 => assert_eq!(pagination(&rendered(outcome).data).page, p),
            _ => assert_eq!(location(&outcome), "/page/3/", "page {p}"),
        }
    }

    for token in ["abc", "-1", "1x"] {
        let outcome = resolve(&resolver, &format!("/page/{token}/")).await;
        assert_eq!(location(&outcome), "/", "token {token}");
    }
}

#[tokio::test]
async fn test_huge_page_number_goes_to_last_page() {
    let resolver = resolver();
    for path in ["/page/99999999999/", "/page/4294967296/", "/page/099999999999/"] {
        assert_eq!(location(&resolve(&resolver, path).await), "/page/3/", "{path}");
    }
    assert_eq!(
        location(&resolve(&resolver, "/tag/news/page/99999999999/").await),
        "/tag/news/page/2/"
    );
    assert_eq!(location(&resolve(&resolver, "/rss/99999999999/").await), "/rss/");
}

#[tokio::test]
async fn test_non_canonical_page_forms() {
    let resolver = resolver();
    assert_eq!(location(&resolve(&resolver, "/page/02/").await), "/page/2/");
    assert_eq!(location(&resolve(&resolver, "/page/07/").await), "/page/3/");
    assert_eq!(location(&resolve(&resolver, "/page/2").await), "/page/2/");
    assert_eq!(location(&resolve(&resolver, "/page/01/").await), "/");
}

#[tokio::test]
async fn test_beyond_single_page_uses_unsuffixed_form() {
    let store = store();
    store.set(SettingKey::PostsPerPage, "10");
    let resolver = resolver_with(ResolverConfig::default(), store);
    assert_eq!(location(&resolve(&resolver, "/page/2/").await), "/");
}

#[tokio::test]
async fn test_empty_site_renders_first_page() {
    let store = MemoryStore::new();
    store.set(SettingKey::PostsPerPage, "5");
    store.set(SettingKey::ActiveTheme, "casper");
    let resolver = resolver_with(ResolverConfig::default(), store);

    let render = rendered(resolve(&resolver, "/").await);
    assert!(slugs(&render.data).is_empty());
    assert_eq!(location(&resolve(&resolver, "/page/2/").await), "/");
}

#[tokio::test]
async fn test_unusable_page_size_falls_back() {
    for raw in ["abc", "0", "-3", ""] {
        let store = store();
        store.set(SettingKey::PostsPerPage, raw);
        let resolver = resolver_with(ResolverConfig::default(), store);
        let render = rendered(resolve(&resolver, "/").await);
        assert_eq!(
            pagination(&render.data).limit,
            crate::store::DEFAULT_PAGE_SIZE,
            "{raw:?}"
        );
    }
}

#[test]
fn test_parse_page_size() {
    assert_eq!(parse_page_size("10"), Some(10));
    assert_eq!(parse_page_size(" 7 per page"), Some(7));
    assert_eq!(parse_page_size("abc"), None);
    assert_eq!(parse_page_size("0"), None);
    assert_eq!(parse_page_size("-5"), None);
    assert_eq!(parse_page_size(""), None);
}

#[tokio::test]
async fn test_tag_listing() {
    let resolver = resolver();
    let render = rendered(resolve(&resolver, "/tag/news/").await);
    assert_eq!(render.kind, RouteKind::TagListing);
    assert_eq!(render.view, "tag");
    assert_eq!(slugs(&render.data), ["fifth", "third"]);
    let RenderData::TagListing { tag, .. } = &render.data else {
        panic!("expected tag listing");
    };
    assert_eq!(tag.as_ref(), Some(&news()));

    let render = rendered(resolve(&resolver, "/tag/news/page/2/").await);
    assert_eq!(slugs(&render.data), ["my-post"]);
}

#[tokio::test]
async fn test_tag_listing_canonical_forms() {
    let resolver = resolver();
    assert_eq!(
        location(&resolve(&resolver, "/tag/news/page/1/").await),
        "/tag/news/"
    );
    assert_eq!(
        location(&resolve(&resolver, "/tag/news/page/x/").await),
        "/tag/news/"
    );
    assert_eq!(
        location(&resolve(&resolver, "/tag/news/page/9/").await),
        "/tag/news/page/2/"
    );
    assert_eq!(location(&resolve(&resolver, "/tag/news").await), "/tag/news/");
}

#[tokio::test]
async fn test_tag_view_falls_back_to_index() {
    let store = store();
    store.set(SettingKey::ActiveTheme, "bare");
    let resolver = resolver_with(ResolverConfig::default(), store);
    assert_eq!(rendered(resolve(&resolver, "/tag/news/").await).view, "index");
}

// ============================================================================
// Single items
// ============================================================================

#[tokio::test]
async fn test_single_date_validation() {
    let resolver = resolver();
    let render = rendered(resolve(&resolver, "/2015/03/02/my-post/").await);
    assert_eq!(render.kind, RouteKind::Single);
    assert_eq!(render.view, "post");
    assert_eq!(slugs(&render.data), ["my-post"]);

    assert_eq!(
        resolve(&resolver, "/2015/04/02/my-post/").await,
        Outcome::NotFound(Miss::DateMismatch)
    );
}

#[tokio::test]
async fn test_partial_date_template() {
    let store = store();
    store.set(SettingKey::Permalinks, "/:year/:slug/");
    let resolver = resolver_with(ResolverConfig::default(), store);

    assert!(matches!(
        resolve(&resolver, "/2015/my-post/").await,
        Outcome::Render(_)
    ));
    assert_eq!(
        resolve(&resolver, "/2016/my-post/").await,
        Outcome::NotFound(Miss::DateMismatch)
    );
}

#[tokio::test]
async fn test_edit_suffix() {
    let resolver = resolver();
    let outcome = resolve(&resolver, "/2015/03/02/my-post/edit/").await;
    assert_eq!(
        outcome,
        Outcome::Redirect(Redirect {
            location: "/ghost/editor/1/".into(),
            kind: RedirectKind::Edit,
        })
    );

    assert_eq!(
        resolve(&resolver, "/2015/03/02/my-post/bogus/").await,
        Outcome::NotFound(Miss::BadEditSuffix)
    );
    // Date check runs before the edit check
    assert_eq!(
        resolve(&resolver, "/2015/04/02/my-post/edit/").await,
        Outcome::NotFound(Miss::DateMismatch)
    );
}

#[tokio::test]
async fn test_legacy_static_page() {
    let resolver = resolver();
    let render = rendered(resolve(&resolver, "/about/").await);
    assert_eq!(render.view, "page-about");

    let outcome = resolve(&resolver, "/about/edit/").await;
    assert_eq!(location(&outcome), "/ghost/editor/6/");

    // Posts are never reachable through the legacy grammar
    assert_eq!(
        resolve(&resolver, "/my-post/").await,
        Outcome::NotFound(Miss::NotStaticPage)
    );
}

#[tokio::test]
async fn test_legacy_requires_canonical_item() {
    let store = store();
    store.insert(post(7, "dup", "2015-01-01", false));
    store.insert(static_page(8, "dup"));
    let resolver = resolver_with(ResolverConfig::default(), store);

    assert_eq!(
        resolve(&resolver, "/dup/").await,
        Outcome::NotFound(Miss::NotStaticPage)
    );
}

#[tokio::test]
async fn test_single_misses() {
    let resolver = resolver();
    assert_eq!(
        resolve(&resolver, "/a/b/c/").await,
        Outcome::NotFound(Miss::NoMatch)
    );
    assert_eq!(
        resolve(&resolver, "/nothing/").await,
        Outcome::NotFound(Miss::ItemAbsent)
    );
}

#[tokio::test]
async fn test_single_trailing_slash() {
    let resolver = resolver();
    assert_eq!(location(&resolve(&resolver, "/about").await), "/about/");
    assert_eq!(
        location(&resolve(&resolver, "/2015/03/02/my-post").await),
        "/2015/03/02/my-post/"
    );
}

#[tokio::test]
async fn test_single_redirects_to_item_permalink() {
    let resolver = resolver();
    for (path, expected) in [
        ("//2015/03/02/my-post/", "/2015/03/02/my-post/"),
        ("/2015/03/02//my-post/", "/2015/03/02/my-post/"),
        ("/2015/03/02/my-post//", "/2015/03/02/my-post/"),
        ("/about//", "/about/"),
        ("//about/", "/about/"),
        // Static pages live at the legacy path even when the date template matches
        ("/2014/01/01/about/", "/about/"),
    ] {
        let outcome = resolve(&resolver, path).await;
        assert_eq!(location(&outcome), expected, "{path}");
        // The target resolves without another redirect
        assert!(
            matches!(resolve(&resolver, expected).await, Outcome::Render(_)),
            "{expected}"
        );
    }
}

#[tokio::test]
async fn test_offset_publish_date_uses_utc_day() {
    let store = store();
    store.insert(post(9, "late", "2015-03-02T23:30:00-02:00", false));
    let resolver = resolver_with(ResolverConfig::default(), store);

    let render = rendered(resolve(&resolver, "/2015/03/03/late/").await);
    assert_eq!(slugs(&render.data), ["late"]);
    assert_eq!(
        resolve(&resolver, "/2015/03/02/late/").await,
        Outcome::NotFound(Miss::DateMismatch)
    );

    let doc = feed(resolve(&resolver, "/rss/").await);
    let late = doc.items.iter().find(|item| item.title == "late").unwrap();
    assert_eq!(late.url, "http://localhost:2368/2015/03/03/late/");
    assert!(late.published.is_some());
}

#[tokio::test]
async fn test_single_padded_id_redirects() {
    let store = store();
    store.set(SettingKey::Permalinks, "/p/:id/");
    let resolver = resolver_with(ResolverConfig::default(), store);
    assert_eq!(location(&resolve(&resolver, "/p/03/").await), "/p/3/");
}

#[tokio::test]
async fn test_single_without_generatable_permalink() {
    let store = store();
    store.set(SettingKey::Permalinks, "/:section/:slug/");
    let resolver = resolver_with(ResolverConfig::default(), store);
    assert_eq!(
        resolve(&resolver, "/blog/my-post/").await,
        Outcome::NotFound(Miss::NoPermalink)
    );
}

#[tokio::test]
async fn test_permalink_setting_change() {
    let resolver = resolver();
    assert!(matches!(
        resolve(&resolver, "/2015/03/02/my-post/").await,
        Outcome::Render(_)
    ));

    resolver.store().set(SettingKey::Permalinks, "/:slug/");
    let render = rendered(resolve(&resolver, "/my-post/").await);
    assert_eq!(slugs(&render.data), ["my-post"]);
    assert_eq!(
        resolve(&resolver, "/2015/03/02/my-post/").await,
        Outcome::NotFound(Miss::NoMatch)
    );
}

#[tokio::test]
async fn test_id_permalink() {
    let store = store();
    store.set(SettingKey::Permalinks, "/p/:id/");
    let resolver = resolver_with(ResolverConfig::default(), store);

    let render = rendered(resolve(&resolver, "/p/3/").await);
    assert_eq!(slugs(&render.data), ["third"]);
    assert_eq!(
        resolve(&resolver, "/p/x/").await,
        Outcome::NotFound(Miss::ItemAbsent)
    );
}

// ============================================================================
// Feeds
// ============================================================================

#[track_caller]
fn feed(outcome: Outcome) -> crate::feed::FeedDocument {
    match outcome {
        Outcome::Feed(doc) => doc,
        other => panic!("expected feed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_feed() {
    let resolver = resolver();
    let doc = feed(resolve(&resolver, "/rss/").await);

    assert_eq!(doc.metadata.title, "Blog");
    assert_eq!(doc.metadata.description, "Words");
    assert_eq!(doc.metadata.site_url, "http://localhost:2368/");
    assert_eq!(doc.metadata.feed_url, "http://localhost:2368/rss/");
    assert_eq!(doc.metadata.ttl, 60);

    // Feeds ignore postsPerPage
    assert_eq!(doc.items.len(), 5);
    let first = &doc.items[0];
    assert_eq!(first.guid, "uuid-5");
    assert_eq!(first.url, "http://localhost:2368/2015/07/01/fifth/");
    assert!(first
        .content
        .contains(r#"<img src="http://localhost:2368/img/a.png">"#));
    assert!(first.content.contains(r#"<a href="https://x.org/">"#));

    let xml = doc.to_xml().unwrap();
    assert!(xml.contains("<title>Blog</title>"));
}

#[tokio::test]
async fn test_tag_feed() {
    let resolver = resolver();
    let doc = feed(resolve(&resolver, "/tag/news/rss/").await);
    assert_eq!(doc.metadata.title, "News - Blog");
    assert_eq!(doc.metadata.feed_url, "http://localhost:2368/tag/news/rss/");
    assert_eq!(doc.items.len(), 3);
    assert!(doc.items.iter().all(|item| item.categories == ["News"]));

    let doc = feed(resolve(&resolver, "/tag/unknown/rss/").await);
    assert_eq!(doc.metadata.title, "Blog");
    assert!(doc.items.is_empty());
}

#[tokio::test]
async fn test_feed_canonical_forms() {
    let resolver = resolver();
    assert_eq!(location(&resolve(&resolver, "/rss/1/").await), "/rss/");
    assert_eq!(location(&resolve(&resolver, "/rss/0/").await), "/rss/");
    assert_eq!(location(&resolve(&resolver, "/rss/4/").await), "/rss/");
    assert_eq!(location(&resolve(&resolver, "/rss").await), "/rss/");
    assert_eq!(
        location(&resolve(&resolver, "/tag/news/rss/1/").await),
        "/tag/news/rss/"
    );
}

#[tokio::test]
async fn test_feed_setting_failure_surfaces() {
    let store = store();
    store.fail_setting(SettingKey::Description, StoreError::internal("settings down"));
    let resolver = resolver_with(ResolverConfig::default(), store);

    let err = resolver.resolve("/rss/").await.unwrap_err();
    assert_eq!(err.status(), 500);
    assert!(matches!(err, ResolveError::Store(_)));
}

// ============================================================================
// Errors, canonical fixed point, configuration
// ============================================================================

#[tokio::test]
async fn test_store_errors_keep_status() {
    let store = store();
    store.fail_browse(StoreError::bad_request("bad filter"));
    store.fail_read(StoreError::new(503, "unavailable"));
    let resolver = resolver_with(ResolverConfig::default(), store);

    assert_eq!(resolver.resolve("/").await.unwrap_err().status(), 400);
    assert_eq!(resolver.resolve("/about/").await.unwrap_err().status(), 503);
    // Malformed tokens redirect without touching the store
    assert_eq!(location(&resolve(&resolver, "/page/x/").await), "/");
}

#[tokio::test]
async fn test_missing_permalink_setting_is_an_error() {
    let store = store();
    store.unset(SettingKey::Permalinks);
    let resolver = resolver_with(ResolverConfig::default(), store);
    assert_eq!(resolver.resolve("/about/").await.unwrap_err().status(), 404);
}

#[tokio::test]
async fn test_invalid_permalink_setting() {
    let store = store();
    store.set(SettingKey::Permalinks, "/:slug/:slug/");
    let resolver = resolver_with(ResolverConfig::default(), store);
    let err = resolver.resolve("/about/").await.unwrap_err();
    assert!(matches!(err, ResolveError::Template(_)));
    assert_eq!(err.status(), 500);
}

#[tokio::test]
async fn test_redirects_are_fixed_points() {
    let resolver = resolver();
    let paths = [
        "/page/1/",
        "/page/0/",
        "/page/02/",
        "/page/9/",
        "/page/3",
        "/tag/news/page/1/",
        "/tag/news/page/5/",
        "/rss/1/",
        "/rss/7/",
        "/tag/news/rss/01/",
        "/about",
        "/2015/03/02/my-post",
    ];

    for path in paths {
        let outcome = resolve(&resolver, path).await;
        let target = location(&outcome).to_string();
        let again = resolve(&resolver, &target).await;
        assert!(
            !again.is_redirect(),
            "{path} -> {target} -> {:?}",
            again.location()
        );
    }
}

#[tokio::test]
async fn test_subdirectory_prefix() {
    let config =
        ResolverConfig::from_str("[site]\nurl = \"https://example.com\"\nsubdir = \"/blog\"")
            .unwrap();
    let resolver = resolver_with(config, store());

    assert_eq!(location(&resolve(&resolver, "/page/1/").await), "/blog/");
    assert_eq!(
        location(&resolve(&resolver, "/tag/news/page/1/").await),
        "/blog/tag/news/"
    );
    assert_eq!(
        location(&resolve(&resolver, "/about/edit/").await),
        "/blog/ghost/editor/6/"
    );

    let doc = feed(resolve(&resolver, "/rss/").await);
    assert_eq!(doc.metadata.site_url, "https://example.com/blog/");
    assert_eq!(doc.metadata.feed_url, "https://example.com/blog/rss/");
    assert_eq!(doc.items[0].url, "https://example.com/blog/2015/07/01/fifth/");
}

#[tokio::test]
async fn test_reload_swaps_snapshot() {
    let resolver = resolver();
    let before = resolver.snapshot();

    let mut config = ResolverConfig::default();
    config.routes.tag_base = "topic".into();
    resolver.reload(config).unwrap();

    assert!(matches!(
        resolve(&resolver, "/topic/news/").await,
        Outcome::Render(_)
    ));
    // `/tag/news/` is now a single-item candidate
    assert!(resolve(&resolver, "/tag/news/").await.is_not_found());
    // Earlier snapshot is untouched
    assert_eq!(before.config.routes.tag_base, "tag");
}

#[tokio::test]
async fn test_reload_rejects_invalid_config() {
    let resolver = resolver();
    let mut config = ResolverConfig::default();
    config.routes.page_base = String::new();
    assert!(resolver.reload(config).is_err());
    assert!(matches!(resolve(&resolver, "/").await, Outcome::Render(_)));
}
