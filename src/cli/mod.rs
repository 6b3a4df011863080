//! Command-line interface module.

mod args;
pub mod resolve;
pub mod template;

pub use args::{Cli, Commands, ResolveArgs, TemplateArgs};

use anyhow::{Context, Result};

use crate::config::ResolverConfig;

/// Load and validate the configuration named by `-C`, or the defaults.
pub fn load_config(cli: &Cli) -> Result<ResolverConfig> {
    let config = match &cli.config {
        Some(path) => ResolverConfig::from_path(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ResolverConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
