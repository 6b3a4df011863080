//! Core types - pure abstractions shared across the codebase.

mod link;
mod url;

pub use link::{LinkKind, is_external_link};
pub use url::{RequestPath, UrlPath, normalize_subdir, split_segments};
