//! Filesystem probing.
//!
//! The closure builder only ever asks two questions of the filesystem: what
//! kind of entry lives at a path (without following symlinks), and where a
//! symlink points. The [`FilesystemProbe`] trait abstracts those questions so
//! the closure logic can be exercised against an in-memory tree.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of a filesystem entry, as seen by `lstat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A symbolic link (not followed).
    Symlink,
    /// A directory.
    Directory,
    /// Anything else: device node, FIFO, socket.
    Other,
}

impl EntryKind {
    /// Classify a file type obtained without following symlinks.
    #[must_use]
    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// Read-only queries against a filesystem.
pub trait FilesystemProbe {
    /// Return the kind of entry at `path` without following a final symlink.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the path does not exist or cannot
    /// be inspected.
    fn kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Return the raw target of the symlink at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Whether anything (of any kind) exists at `path`.
    fn exists(&self, path: &Path) -> bool {
        self.kind(path).is_ok()
    }
}

/// Probe backed by the real filesystem.
///
/// # Examples
///
/// ```
/// use micropack::probe::{EntryKind, FilesystemProbe, SystemProbe};
/// use std::path::Path;
///
/// let probe = SystemProbe;
/// assert_eq!(probe.kind(Path::new("/")).unwrap(), EntryKind::Directory);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl FilesystemProbe for SystemProbe {
    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        fs::symlink_metadata(path).map(|meta| EntryKind::from_file_type(meta.file_type()))
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path)
    }
}

/// In-memory filesystem for tests and dry runs.
///
/// Parent directories are not implied: register every entry the scenario
/// needs.
///
/// # Examples
///
/// ```
/// use micropack::probe::{EntryKind, FilesystemProbe, MemoryProbe};
/// use std::path::Path;
///
/// let probe = MemoryProbe::new()
///     .with_dir("/bin")
///     .with_file("/bin/ls")
///     .with_symlink("/bin/dir", "ls");
///
/// assert_eq!(probe.kind(Path::new("/bin/ls")).unwrap(), EntryKind::File);
/// assert_eq!(probe.read_link(Path::new("/bin/dir")).unwrap(), Path::new("ls"));
/// assert!(!probe.exists(Path::new("/bin/cat")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryProbe {
    entries: HashMap<PathBuf, EntryKind>,
    links: HashMap<PathBuf, PathBuf>,
}

impl MemoryProbe {
    /// Create an empty in-memory filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a regular file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(path.into(), EntryKind::File);
        self
    }

    /// Register a directory.
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(path.into(), EntryKind::Directory);
        self
    }

    /// Register a symlink with its raw (possibly relative) target.
    #[must_use]
    pub fn with_symlink(mut self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.entries.insert(path.clone(), EntryKind::Symlink);
        self.links.insert(path, target.into());
        self
    }

    /// Register an entry that is neither file, directory nor symlink.
    #[must_use]
    pub fn with_special(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(path.into(), EntryKind::Other);
        self
    }
}

impl FilesystemProbe for MemoryProbe {
    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        self.entries.get(path).copied().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such entry", path.display()),
            )
        })
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.links.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{}: not a symlink", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_system_probe_kinds() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "x").unwrap();

        let probe = SystemProbe;
        assert_eq!(probe.kind(dir.path()).unwrap(), EntryKind::Directory);
        assert_eq!(probe.kind(&file).unwrap(), EntryKind::File);
        assert!(probe.kind(&dir.path().join("missing")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_probe_does_not_follow_symlinks() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        fs::create_dir(&target).unwrap();
        symlink("target", &link).unwrap();

        let probe = SystemProbe;
        assert_eq!(probe.kind(&link).unwrap(), EntryKind::Symlink);
        assert_eq!(probe.read_link(&link).unwrap(), PathBuf::from("target"));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_probe_dangling_symlink_exists() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let link = dir.path().join("dangling");
        symlink("nowhere", &link).unwrap();

        assert!(SystemProbe.exists(&link));
    }

    #[test]
    fn test_memory_probe_read_link_on_file_fails() {
        let probe = MemoryProbe::new().with_file("/etc/passwd");
        let err = probe.read_link(Path::new("/etc/passwd")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_memory_probe_special() {
        let probe = MemoryProbe::new().with_special("/run/socket");
        assert_eq!(probe.kind(Path::new("/run/socket")).unwrap(), EntryKind::Other);
    }
}
