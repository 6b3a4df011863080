//! Permaroute - content-path resolution and canonicalization.
//!
//! Given a request path for a blog-style content site, decide which resource
//! it addresses (home listing, tag listing, single item, feed), enforce one
//! canonical URL per resource and page, and describe what to serve.
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── config/    # ResolverConfig (permaroute.toml)
//! ├── core/      # RequestPath, UrlPath, LinkKind
//! ├── route/     # PathPattern, permalinks, page tokens, route table
//! ├── store/     # settings + item collaborators, MemoryStore
//! ├── view       # theme view selection
//! ├── resolve/   # Resolver: listing, tag, single, feed
//! ├── feed/      # FeedAssembler, RSS output
//! ├── cli/       # `permaroute` command line
//! └── utils/     # DateTimeUtc
//! ```
//!
//! # Example
//!
//! ```ignore
//! let resolver = Resolver::new(ResolverConfig::default(), store, themes)?;
//! match resolver.resolve("/tag/news/page/1/").await? {
//!     Outcome::Redirect(r) => assert_eq!(r.location, "/tag/news/"),
//!     _ => unreachable!(),
//! }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod feed;
pub mod logger;
pub mod resolve;
pub mod route;
pub mod store;
pub mod utils;
pub mod view;

pub use config::{ConfigError, ResolverConfig};
pub use resolve::{Miss, Outcome, Redirect, RedirectKind, Render, RenderData, ResolveError, Resolver};
pub use store::{ItemStore, MemoryStore, SettingsStore, StoreError};
pub use view::{ThemeCatalog, ThemeViews};
