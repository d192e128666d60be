//! Lexical path handling.
//!
//! Every path that enters a closure is first normalized: made absolute and
//! cleaned of `.`/`..` components and redundant separators. The normalized
//! form is the key used across the file and directory sets.
//!
//! # Path Relationships
//!
//! Prefix checks (is this file under that directory, does this path fall in
//! an ignored tree) are made on whole components:
//!
//! ```
//! use micropack::path::PathRelationship;
//! use std::path::Path;
//!
//! let dir = Path::new("/tmp");
//! assert!(PathRelationship::is_within(Path::new("/tmp/x"), dir));
//! assert!(!PathRelationship::is_within(Path::new("/tmpfoo"), dir));
//! ```

pub mod normalize;
pub mod relationship;

pub use normalize::{normalize, resolve_components, resolve_link_target};
pub use relationship::PathRelationship;
