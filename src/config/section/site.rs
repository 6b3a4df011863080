//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.com"   # Absolute base URL, used for feed links
//! subdir = "/blog"              # Mount prefix for every generated path
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ConfigError;
use crate::core::normalize_subdir;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute `http(s)` base URL of the site.
    pub url: String,

    /// Mount prefix; `""`, `/blog` and `blog/` are all accepted.
    pub subdir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:2368".to_string(),
            subdir: String::new(),
        }
    }
}

impl SiteConfig {
    /// Subdirectory in `/x/y` form, or `""` at the root.
    pub fn subdir(&self) -> String {
        normalize_subdir(&self.subdir)
    }

    /// Parsed base URL with the subdirectory appended, always ending in `/`.
    ///
    /// ```text
    /// url=https://example.com  subdir=/blog  ->  https://example.com/blog/
    /// ```
    pub fn root_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(self.url.trim())
            .map_err(|e| ConfigError::Validation(format!("site.url `{}`: {e}", self.url)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "site.url `{}` must use http or https",
                self.url
            )));
        }

        let path = format!("{}{}/", url.path().trim_end_matches('/'), self.subdir());
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    pub(crate) fn validate(&self, errors: &mut Vec<String>) {
        if let Err(e) = self.root_url() {
            errors.push(e.to_string());
        }
    }
}
