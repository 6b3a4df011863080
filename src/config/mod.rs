//! Resolver configuration management for `permaroute.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── site       # [site]
//! │   ├── routes     # [routes]
//! │   └── feed       # [feed]
//! ├── error          # ConfigError
//! └── mod.rs         # ResolverConfig (this file)
//! ```
//!
//! Configuration is read once and handed to the resolver, which compiles it
//! into an immutable snapshot. Reloading builds a new snapshot and swaps it
//! in atomically (see `resolve::Resolver::reload`).

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{FeedConfig, RoutesConfig, SiteConfig};

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::log;

/// Root configuration structure representing `permaroute.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Base URL and mount prefix
    #[serde(default)]
    pub site: SiteConfig,

    /// Path bases and fixed grammars
    #[serde(default)]
    pub routes: RoutesConfig,

    /// Feed document settings
    #[serde(default)]
    pub feed: FeedConfig,
}

impl ResolverConfig {
    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        self.site.validate(&mut errors);
        self.routes.validate(&mut errors);

        if self.feed.generator.trim().is_empty() {
            errors.push("feed.generator must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ResolverConfig {
    let (parsed, ignored) = ResolverConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
