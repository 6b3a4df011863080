//! URL grammars: compiled path patterns, item permalinks, pagination.
//!
//! # Module Structure
//!
//! ```text
//! route/
//! ├── pattern     # PathPattern: compile / match / generate
//! ├── permalink   # PermalinkTemplate + PermalinkRegistry (configured, legacy)
//! ├── page        # PageToken, pagination canonicalization
//! └── table       # RouteTable: path -> resource kind
//! ```

pub mod page;
pub mod pattern;
pub mod permalink;
pub mod table;

pub use page::{PageToken, PagedPath, RangeCheck, TokenCheck, clamp_or_reject, is_canonical_token};
pub use pattern::{Fields, GenerateError, PathPattern, Segment, TemplateError};
pub use permalink::{EDIT_FIELD, PermalinkMatch, PermalinkRegistry, PermalinkTemplate, item_fields};
pub use table::{ResolvedRoute, RouteKind, RouteTable};
