//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Permalink resolution and canonicalization toolkit
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (built-in defaults when omitted)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve a request path against a site fixture
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Compile a permalink template, then match or generate paths with it
    #[command(visible_alias = "t")]
    Template {
        #[command(flatten)]
        args: TemplateArgs,
    },
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Request path, e.g. `/tag/news/page/2/`
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Site fixture: settings, themes and items (TOML)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub site: PathBuf,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

/// Template command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct TemplateArgs {
    /// Permalink template, e.g. `/:year/:month/:day/:slug/`
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Field for path generation (repeatable)
    #[arg(short, long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Path to match against the template (edit suffix allowed)
    #[arg(short, long = "match", value_name = "PATH")]
    pub matches: Option<String>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}
