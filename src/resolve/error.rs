//! Errors that escape resolution.
//!
//! Recoverable conditions never show up here: they become redirects or
//! not-found outcomes. What remains are backing-store failures and broken
//! stored configuration.

use thiserror::Error;

use crate::feed::FeedError;
use crate::route::TemplateError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored permalink setting does not compile.
    #[error("permalink setting is invalid: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl ResolveError {
    /// Status code to report: the store's own code, 500 otherwise.
    pub const fn status(&self) -> u16 {
        match self {
            Self::Store(err) => err.status,
            Self::Template(_) | Self::Feed(_) => 500,
        }
    }
}
