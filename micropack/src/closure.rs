//! Closure construction.
//!
//! The [`ClosureBuilder`] owns the two accumulating sets of a pack run: files
//! (regular files and symlinks) and directories seen directly. Candidates are
//! fed in one at a time; symlinks are recorded as entries and their targets
//! absorbed in turn, so the result is closed under symlink-following.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::classify::IgnoreList;
use crate::error::{Error, Result};
use crate::path::{normalize, resolve_link_target};
use crate::probe::{EntryKind, FilesystemProbe, SystemProbe};
use crate::reduce::{self, Closure};

/// What happened to a single absorbed candidate.
///
/// Describes the candidate itself, not the tail of any symlink chain it
/// started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absorbed {
    /// Recorded as a regular file.
    File,
    /// Recorded as a symlink; its target was absorbed as well.
    Symlink,
    /// Recorded as a directory.
    Directory,
    /// Matched the ignore-list and was skipped.
    Ignored,
    /// Did not exist, could not be probed, or was a special file.
    Discarded,
}

impl Absorbed {
    /// Whether the candidate entered the closure.
    #[must_use]
    pub fn is_recorded(self) -> bool {
        matches!(self, Self::File | Self::Symlink | Self::Directory)
    }
}

/// Accumulates the file and directory sets of a single pack run.
///
/// # Examples
///
/// ```
/// use micropack::classify::IgnoreList;
/// use micropack::closure::ClosureBuilder;
/// use micropack::probe::MemoryProbe;
/// use std::path::Path;
///
/// let probe = MemoryProbe::new()
///     .with_file("/bin/busybox")
///     .with_symlink("/bin/ls", "busybox")
///     .with_dir("/proc");
///
/// let mut builder = ClosureBuilder::with_probe(probe, IgnoreList::default());
/// builder.absorb(Path::new("/bin/ls")).unwrap();
/// builder.absorb(Path::new("/proc")).unwrap();
///
/// let closure = builder.finalize(Path::new("/tmp"));
/// let entries: Vec<_> = closure.entries().collect();
/// assert_eq!(entries, [Path::new("/tmp"), Path::new("/bin/busybox"), Path::new("/bin/ls")]);
/// ```
#[derive(Debug)]
pub struct ClosureBuilder<P = SystemProbe> {
    probe: P,
    ignore: IgnoreList,
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
}

impl ClosureBuilder<SystemProbe> {
    /// Create a builder over the real filesystem.
    #[must_use]
    pub fn new(ignore: IgnoreList) -> Self {
        Self::with_probe(SystemProbe, ignore)
    }
}

impl<P: FilesystemProbe> ClosureBuilder<P> {
    /// Create a builder over an arbitrary filesystem probe.
    #[must_use]
    pub fn with_probe(probe: P, ignore: IgnoreList) -> Self {
        Self {
            probe,
            ignore,
            files: HashSet::new(),
            dirs: HashSet::new(),
        }
    }

    /// The probe used for filesystem queries.
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// The ignore-list in effect.
    pub fn ignore_list(&self) -> &IgnoreList {
        &self.ignore
    }

    /// Files and symlinks recorded so far.
    pub fn files(&self) -> &HashSet<PathBuf> {
        &self.files
    }

    /// Directories recorded so far.
    pub fn dirs(&self) -> &HashSet<PathBuf> {
        &self.dirs
    }

    /// Absorb one candidate path into the closure.
    ///
    /// Relative candidates are resolved against the working directory.
    /// Symlinks are recorded and followed until the chain ends in a file,
    /// a directory, an ignored path or nothing at all. Missing paths and
    /// probe failures are not errors; the candidate is simply discarded.
    ///
    /// # Errors
    ///
    /// Returns `SymlinkCycle` if following a chain of links revisits a path.
    /// Every link seen before the cycle stays recorded.
    pub fn absorb(&mut self, candidate: &Path) -> Result<Absorbed> {
        let mut current = match normalize(candidate) {
            Ok(path) => path,
            Err(e) => {
                log::debug!("discarding {}: {e}", candidate.display());
                return Ok(Absorbed::Discarded);
            }
        };

        let mut visited = HashSet::new();
        let mut first: Option<Absorbed> = None;

        loop {
            if !visited.insert(current.clone()) {
                log::debug!(
                    "symlink chain of {} revisits {}",
                    candidate.display(),
                    current.display()
                );
                return Err(Error::SymlinkCycle { path: current });
            }

            let outcome = self.absorb_one(&current);
            let head = *first.get_or_insert(outcome.absorbed);
            match outcome.next {
                Some(next) => current = next,
                None => return Ok(head),
            }
        }
    }

    /// Classify and record a single normalized path, returning the next hop
    /// when it is a followable symlink.
    fn absorb_one(&mut self, path: &Path) -> Step {
        let kind = match self.probe.kind(path) {
            Ok(kind) => kind,
            Err(e) => {
                log::debug!("discarding {}: {e}", path.display());
                return Step::done(Absorbed::Discarded);
            }
        };

        if kind != EntryKind::Other && self.ignore.is_ignored(path) {
            log::debug!("ignoring {} {}", kind_label(kind), path.display());
            return Step::done(Absorbed::Ignored);
        }

        match kind {
            EntryKind::Symlink => {
                self.files.insert(path.to_path_buf());
                match self.probe.read_link(path) {
                    Ok(target) => {
                        let next = resolve_link_target(path, &target);
                        log::debug!("following symlink {} -> {}", path.display(), next.display());
                        Step {
                            absorbed: Absorbed::Symlink,
                            next: Some(next),
                        }
                    }
                    Err(e) => {
                        log::debug!("cannot read symlink {}: {e}", path.display());
                        Step::done(Absorbed::Symlink)
                    }
                }
            }
            EntryKind::Directory => {
                self.dirs.insert(path.to_path_buf());
                Step::done(Absorbed::Directory)
            }
            EntryKind::File => {
                self.files.insert(path.to_path_buf());
                Step::done(Absorbed::File)
            }
            EntryKind::Other => {
                log::debug!("discarding special file {}", path.display());
                Step::done(Absorbed::Discarded)
            }
        }
    }

    /// Finish the run, reducing directories and ensuring `scratch_dir`.
    ///
    /// Consumes the builder, so a closure is finalized at most once.
    #[must_use]
    pub fn finalize(self, scratch_dir: &Path) -> Closure {
        let files: BTreeSet<PathBuf> = self.files.into_iter().collect();
        let dirs: BTreeSet<PathBuf> = self.dirs.into_iter().collect();
        reduce::reduce(dirs, files, scratch_dir)
    }
}

struct Step {
    absorbed: Absorbed,
    next: Option<PathBuf>,
}

impl Step {
    fn done(absorbed: Absorbed) -> Self {
        Self {
            absorbed,
            next: None,
        }
    }
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::File => "file",
        EntryKind::Symlink => "symlink",
        EntryKind::Directory => "directory",
        EntryKind::Other => "entry",
    }
}
