//! Resolve command implementation.
//!
//! Loads a site fixture into a [`MemoryStore`], resolves one path and prints
//! the outcome: render payload as JSON, feed XML, redirect location or
//! not-found. Logs go to stderr, payloads to stdout.

use std::fs;
use std::io::Write;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use super::{Cli, ResolveArgs, load_config};
use crate::resolve::{Outcome, Resolver};
use crate::store::{MemoryStore, SiteFixture};
use crate::view::ThemeCatalog;
use crate::{debug, log};

pub async fn run_resolve(cli: &Cli, args: &ResolveArgs) -> Result<()> {
    let config = load_config(cli)?;

    let content = fs::read_to_string(&args.site)
        .with_context(|| format!("failed to read {}", args.site.display()))?;
    let fixture = SiteFixture::from_toml(&content)
        .with_context(|| format!("failed to parse {}", args.site.display()))?;
    debug!("fixture"; "{} items, {} themes", fixture.items.len(), fixture.themes.len());

    let catalog = ThemeCatalog::from_map(fixture.themes.clone());
    let resolver = Resolver::new(config, MemoryStore::from_fixture(fixture), catalog)?;

    let outcome = match resolver.resolve(&args.path).await {
        Ok(outcome) => outcome,
        Err(err) => bail!("{} (status {})", err, err.status()),
    };

    let mut stdout = std::io::stdout().lock();
    write_outcome(&mut stdout, &args.path, &outcome, args.pretty)
}

/// Print one outcome: JSON for renders and redirects, XML for feeds, `null`
/// for not-found.
fn write_outcome(out: &mut impl Write, path: &str, outcome: &Outcome, pretty: bool) -> Result<()> {
    match outcome {
        Outcome::Render(render) => {
            log!("render"; "{} view `{}`", path, render.view);
            writeln!(out, "{}", to_json(render, pretty)?)?;
        }
        Outcome::Feed(document) => {
            log!("feed"; "{} ({})", path, document.content_type());
            writeln!(out, "{}", document.to_xml()?)?;
        }
        Outcome::Redirect(redirect) => {
            log!("redirect"; "{} -> {}", path, redirect.location);
            writeln!(out, "{}", to_json(redirect, pretty)?)?;
        }
        Outcome::NotFound(miss) => {
            log!("miss"; "{} not found", path);
            debug!("miss"; "reason: {}", miss);
            writeln!(out, "null")?;
        }
    }

    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::Value;

    const FIXTURE: &str = r#"
        [settings]
        postsPerPage = "5"
        permalinks = "/:slug/"
        activeTheme = "casper"
        title = "Blog"
        description = "Words"

        [themes]
        casper = ["index", "post"]

        [[items]]
        id = 1
        uuid = "a"
        slug = "hello"
        title = "Hello"
        published_at = "2015-03-02"
    "#;

    fn cli(path: &str, site: &std::path::Path) -> Cli {
        Cli::parse_from([
            "permaroute",
            "resolve",
            path,
            "--site",
            site.to_str().unwrap(),
        ])
    }

    fn resolver() -> Resolver<MemoryStore, ThemeCatalog> {
        let fixture = SiteFixture::from_toml(FIXTURE).unwrap();
        let catalog = ThemeCatalog::from_map(fixture.themes.clone());
        Resolver::new(Default::default(), MemoryStore::from_fixture(fixture), catalog).unwrap()
    }

    async fn output(path: &str, pretty: bool) -> String {
        let outcome = resolver().resolve(path).await.unwrap();
        let mut out = Vec::new();
        write_outcome(&mut out, path, &outcome, pretty).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_write_render_json() {
        let json: Value = serde_json::from_str(&output("/hello/", false).await).unwrap();
        assert_eq!(json["kind"], "single");
        assert_eq!(json["view"], "post");
        assert_eq!(json["data"]["post"]["slug"], "hello");

        let json: Value = serde_json::from_str(&output("/", false).await).unwrap();
        assert_eq!(json["kind"], "listing");
        assert_eq!(json["view"], "index");
        assert_eq!(json["data"]["posts"][0]["slug"], "hello");
        assert_eq!(json["data"]["pagination"]["pages"], 1);
    }

    #[tokio::test]
    async fn test_write_redirect_json() {
        let text = output("/page/1/", false).await;
        assert_eq!(text, "{\"location\":\"/\",\"kind\":\"canonical\"}\n");

        let pretty = output("/hello", true).await;
        assert!(pretty.contains("\n  \"location\": \"/hello/\""));
    }

    #[tokio::test]
    async fn test_write_feed_xml() {
        let xml = output("/rss/", false).await;
        assert!(xml.contains("<rss"));
        assert!(xml.contains("<title>Blog</title>"));
        assert!(xml.contains("<link>http://localhost:2368/hello/</link>"));
    }

    #[tokio::test]
    async fn test_write_not_found_null() {
        assert_eq!(output("/missing/", false).await, "null\n");
    }

    #[tokio::test]
    async fn test_run_resolve_from_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{FIXTURE}").unwrap();

        for path in ["/", "/hello/", "/page/1/", "/rss/", "/missing/"] {
            let cli = cli(path, file.path());
            let crate::cli::Commands::Resolve { args } = &cli.command else {
                panic!("expected resolve");
            };
            run_resolve(&cli, args).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_run_resolve_missing_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli("/", &dir.path().join("none.toml"));
        let crate::cli::Commands::Resolve { args } = &cli.command else {
            panic!("expected resolve");
        };
        let err = run_resolve(&cli, args).await.unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&serde_json::json!({"a": 1}), false).unwrap();
        assert_eq!(json, r#"{"a":1}"#);
    }
}
