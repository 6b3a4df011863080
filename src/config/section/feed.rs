//! `[feed]` section configuration.
//!
//! ```toml
//! [feed]
//! generator = "permaroute"   # <generator> element
//! ttl = 60                   # Refresh hint in minutes
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub generator: String,
    pub ttl: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            generator: "permaroute".to_string(),
            ttl: 60,
        }
    }
}
