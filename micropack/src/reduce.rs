//! Directory necessity reduction.
//!
//! An archive only needs an explicit entry for a directory when nothing
//! deeper in the archive already implies it: extracting `/usr/bin/ls`
//! creates `/usr/bin` on the way. This module strips implied directories from
//! the set recorded during closure construction and then guarantees the
//! scratch directory exists.

use std::collections::BTreeSet;
use std::ops::Bound;
use std::path::{Path, PathBuf};

use crate::path::PathRelationship;

/// Default runtime scratch directory.
pub const DEFAULT_SCRATCH_DIR: &str = "/tmp";

/// A finalized closure: needed directories plus files and symlinks.
///
/// Both sets are ordered, so iteration and archive layout are deterministic
/// for a given input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
    directories: BTreeSet<PathBuf>,
    files: BTreeSet<PathBuf>,
}

impl Closure {
    /// Directories that must be created explicitly.
    #[must_use]
    pub fn directories(&self) -> &BTreeSet<PathBuf> {
        &self.directories
    }

    /// Regular files and symlinks.
    #[must_use]
    pub fn files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }

    /// All entries: needed directories first, then files, each in order.
    pub fn entries(&self) -> impl Iterator<Item = &Path> {
        self.directories
            .iter()
            .chain(self.files.iter())
            .map(PathBuf::as_path)
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }

    /// Whether the closure has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `path` is one of the entries.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.directories.contains(path) || self.files.contains(path)
    }
}

/// Reduce the observed directories to those that must be created explicitly.
///
/// A directory is dropped when a file or another directory lies strictly
/// below it. The scratch directory is then added unless a file or needed
/// directory already lives in it.
///
/// # Examples
///
/// ```
/// use micropack::reduce::reduce;
/// use std::collections::BTreeSet;
/// use std::path::{Path, PathBuf};
///
/// let files: BTreeSet<PathBuf> = ["/bin/ls", "/lib/ld-musl.so"].iter().map(PathBuf::from).collect();
/// let dirs: BTreeSet<PathBuf> = ["/bin", "/etc", "/etc/ssl", "/var/empty"].iter().map(PathBuf::from).collect();
///
/// let closure = reduce(dirs, files, Path::new("/tmp"));
/// let needed: Vec<_> = closure.directories().iter().collect();
/// assert_eq!(needed, [Path::new("/etc/ssl"), Path::new("/tmp"), Path::new("/var/empty")]);
/// ```
#[must_use]
pub fn reduce(dirs: BTreeSet<PathBuf>, files: BTreeSet<PathBuf>, scratch_dir: &Path) -> Closure {
    let mut directories = needed_directories(&dirs, &files);

    let scratch_present = files
        .iter()
        .chain(directories.iter())
        .any(|entry| PathRelationship::is_within(entry, scratch_dir));
    if !scratch_present {
        log::debug!("adding scratch directory {}", scratch_dir.display());
        directories.insert(scratch_dir.to_path_buf());
    }

    Closure { directories, files }
}

/// Directories in `dirs` with no file or other directory strictly below them.
#[must_use]
pub fn needed_directories(dirs: &BTreeSet<PathBuf>, files: &BTreeSet<PathBuf>) -> BTreeSet<PathBuf> {
    let all: BTreeSet<&Path> = dirs
        .iter()
        .chain(files.iter())
        .map(PathBuf::as_path)
        .collect();

    dirs.iter()
        .filter(|dir| {
            let implied = has_descendant(&all, dir);
            if implied {
                log::debug!("unneeded directory {}", dir.display());
            }
            !implied
        })
        .cloned()
        .collect()
}

/// Whether any entry of `sorted` lies strictly below `dir`.
///
/// Paths order component by component, so every descendant of `dir` sorts
/// immediately after it; only the successor needs checking.
fn has_descendant(sorted: &BTreeSet<&Path>, dir: &Path) -> bool {
    sorted
        .range::<&Path, _>((Bound::Excluded(dir), Bound::Unbounded))
        .next()
        .is_some_and(|next| PathRelationship::is_strictly_within(next, dir))
}
