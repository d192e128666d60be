//! Search-path resolution for bare command names.
//!
//! Traces often record a command by name (`java`) rather than by path. Such a
//! token is looked up in each directory of a colon-separated search path, in
//! order, the way a shell resolves commands.

use std::env;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::probe::{EntryKind, FilesystemProbe};

/// An ordered list of directories to search for bare names.
///
/// The value is captured once, at construction; later changes to the
/// process environment are not observed.
///
/// # Examples
///
/// ```
/// use micropack::search::SearchPath;
/// use micropack::probe::MemoryProbe;
/// use std::path::Path;
///
/// let probe = MemoryProbe::new().with_file("/opt/jdk/bin/java");
/// let search = SearchPath::new("/usr/bin:/opt/jdk/bin");
///
/// assert_eq!(
///     search.resolve("java", &probe),
///     Some(Path::new("/opt/jdk/bin/java").to_path_buf())
/// );
/// assert_eq!(search.resolve("javac", &probe), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    raw: String,
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Build a search path from a colon-separated value.
    ///
    /// Empty segments are skipped.
    #[must_use]
    pub fn new(value: &str) -> Self {
        let dirs = value
            .split(':')
            .filter(|segment| !segment.is_empty())
            .map(PathBuf::from)
            .collect();
        Self {
            raw: value.to_string(),
            dirs,
        }
    }

    /// Capture the search path from the `PATH` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `MissingSearchPath` if `PATH` is unset or not valid Unicode.
    pub fn from_env() -> Result<Self> {
        env::var("PATH")
            .map(|value| Self::new(&value))
            .map_err(|_| Error::MissingSearchPath)
    }

    /// The directories searched, in order.
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// The original colon-separated value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Find the first `dir/name` that exists and is not a directory.
    ///
    /// Symlinks count as matches and are returned unresolved; the closure
    /// builder follows them. Returns `None` when nothing matches.
    pub fn resolve<N, P>(&self, name: N, probe: &P) -> Option<PathBuf>
    where
        N: AsRef<OsStr>,
        P: FilesystemProbe + ?Sized,
    {
        let name = name.as_ref();
        self.dirs.iter().find_map(|dir| {
            let candidate = dir.join(name);
            match probe.kind(&candidate) {
                Ok(EntryKind::Directory) | Err(_) => None,
                Ok(_) => Some(candidate),
            }
        })
    }
}

/// Whether a candidate token should be looked up on the search path.
///
/// Only bare names qualify: anything containing a separator is treated as a
/// path. Tokens are raw bytes and need not be valid UTF-8.
///
/// # Examples
///
/// ```
/// use micropack::search::is_bare_name;
///
/// assert!(is_bare_name("java"));
/// assert!(!is_bare_name("/usr/bin/java"));
/// assert!(!is_bare_name("bin/java"));
/// assert!(!is_bare_name(""));
/// ```
#[must_use]
pub fn is_bare_name<S: AsRef<OsStr> + ?Sized>(token: &S) -> bool {
    let bytes = token.as_ref().as_bytes();
    !bytes.is_empty() && !bytes.contains(&b'/') && bytes != b"." && bytes != b".."
}
