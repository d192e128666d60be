//! Ignore-list classification.
//!
//! Some trees never belong in a container image: pseudo-filesystems mounted
//! by the runtime (`/proc`, `/sys`, `/dev`), scratch space, and the
//! container engine's own bookkeeping. Paths under them are kept out of the
//! closure.

use std::path::{Path, PathBuf};

use crate::path::PathRelationship;

/// Prefixes ignored by default.
pub const DEFAULT_IGNORE_PATHS: [&str; 5] = ["/dev", "/proc", "/sys", "/tmp", "/var/lib/docker"];

/// Outcome of classifying a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The path may enter the closure.
    Allowed,
    /// The path equals or lies under an ignore-list entry.
    Ignored,
}

impl Classification {
    /// Whether the path was ignored.
    #[must_use]
    pub fn is_ignored(self) -> bool {
        self == Self::Ignored
    }
}

/// An ordered set of ignored path prefixes.
///
/// # Examples
///
/// ```
/// use micropack::classify::{Classification, IgnoreList};
/// use std::path::Path;
///
/// let ignore = IgnoreList::default();
/// assert_eq!(ignore.classify(Path::new("/proc/self/maps")), Classification::Ignored);
/// assert_eq!(ignore.classify(Path::new("/proc")), Classification::Ignored);
/// assert_eq!(ignore.classify(Path::new("/tmpfoo")), Classification::Allowed);
///
/// // The unsafe override disables filtering altogether
/// let unsafe_list = IgnoreList::disabled();
/// assert_eq!(unsafe_list.classify(Path::new("/proc/self/maps")), Classification::Allowed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreList {
    prefixes: Vec<PathBuf>,
    enabled: bool,
}

impl Default for IgnoreList {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_PATHS.iter().map(PathBuf::from))
    }
}

impl IgnoreList {
    /// Build an ignore-list from explicit prefixes, with filtering enabled.
    ///
    /// Duplicates are dropped; the first occurrence keeps its position.
    pub fn new<I>(prefixes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        let mut list = Self {
            prefixes: Vec::new(),
            enabled: true,
        };
        for prefix in prefixes {
            list.push(prefix);
        }
        list
    }

    /// An ignore-list that allows everything (the "unsafe" mode).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            prefixes: Vec::new(),
            enabled: false,
        }
    }

    /// Add a prefix to the list.
    pub fn push(&mut self, prefix: impl Into<PathBuf>) {
        let prefix = crate::path::resolve_components(&prefix.into());
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
    }

    /// Extend the list with more prefixes.
    #[must_use]
    pub fn with_prefixes<I>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        for prefix in prefixes {
            self.push(prefix);
        }
        self
    }

    /// Whether filtering is active.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The configured prefixes, in order.
    #[must_use]
    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    /// Classify a normalized path.
    ///
    /// A path is ignored if it equals a prefix or lies under one on a
    /// component boundary.
    #[must_use]
    pub fn classify(&self, path: &Path) -> Classification {
        if !self.enabled {
            return Classification::Allowed;
        }

        if self
            .prefixes
            .iter()
            .any(|prefix| PathRelationship::is_within(path, prefix))
        {
            Classification::Ignored
        } else {
            Classification::Allowed
        }
    }

    /// Shorthand for `classify(path).is_ignored()`.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.classify(path).is_ignored()
    }
}
