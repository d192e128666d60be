//! Path relationship checking.
//!
//! Relationships are decided on whole path components, so `/tmpfoo` is never
//! considered to live under `/tmp`.

use std::path::Path;

/// Relationship between two paths.
///
/// # Examples
///
/// ```
/// use micropack::path::PathRelationship;
/// use std::path::Path;
///
/// let parent = Path::new("/usr/lib");
/// let child = Path::new("/usr/lib/libc.so.6");
///
/// assert_eq!(
///     PathRelationship::between(parent, child),
///     PathRelationship::Ancestor
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRelationship {
    /// The first path is an ancestor of the second.
    Ancestor,

    /// The first path is a descendant of the second.
    Descendant,

    /// The paths are the same.
    Same,

    /// Neither path is an ancestor or descendant of the other.
    Unrelated,
}

impl PathRelationship {
    /// Determine the relationship between two paths.
    ///
    /// # Examples
    ///
    /// ```
    /// use micropack::path::PathRelationship;
    /// use std::path::Path;
    ///
    /// let rel = PathRelationship::between(Path::new("/a/b"), Path::new("/a"));
    /// assert_eq!(rel, PathRelationship::Descendant);
    ///
    /// // Prefixes only count on component boundaries
    /// let rel = PathRelationship::between(Path::new("/tmp"), Path::new("/tmpfoo"));
    /// assert_eq!(rel, PathRelationship::Unrelated);
    /// ```
    #[must_use]
    pub fn between(path1: &Path, path2: &Path) -> Self {
        if path1 == path2 {
            return Self::Same;
        }

        if path2.starts_with(path1) {
            return Self::Ancestor;
        }

        if path1.starts_with(path2) {
            return Self::Descendant;
        }

        Self::Unrelated
    }

    /// Check if the relationship is hierarchical (not unrelated).
    #[must_use]
    pub fn is_hierarchical(&self) -> bool {
        matches!(self, Self::Ancestor | Self::Descendant | Self::Same)
    }

    /// Check if a path is within a directory (descendant or same).
    ///
    /// # Examples
    ///
    /// ```
    /// use micropack::path::PathRelationship;
    /// use std::path::Path;
    ///
    /// let dir = Path::new("/proc");
    /// assert!(PathRelationship::is_within(Path::new("/proc/self/maps"), dir));
    /// assert!(PathRelationship::is_within(dir, dir));
    /// ```
    #[must_use]
    pub fn is_within(path: &Path, directory: &Path) -> bool {
        matches!(Self::between(path, directory), Self::Descendant | Self::Same)
    }

    /// Check if a path lies strictly below a directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use micropack::path::PathRelationship;
    /// use std::path::Path;
    ///
    /// let dir = Path::new("/bin");
    /// assert!(PathRelationship::is_strictly_within(Path::new("/bin/ls"), dir));
    /// assert!(!PathRelationship::is_strictly_within(dir, dir));
    /// ```
    #[must_use]
    pub fn is_strictly_within(path: &Path, directory: &Path) -> bool {
        Self::between(path, directory) == Self::Descendant
    }
}
