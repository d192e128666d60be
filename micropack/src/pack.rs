//! The end-to-end pack pipeline.
//!
//! A run seeds the closure with the reference executable's loader, absorbs
//! every candidate line of the input stream, finalizes the closure and writes
//! it to a tar archive, optionally followed by a provenance report. Every
//! step runs sequentially on the calling thread.

use std::ffi::OsStr;
use std::io::BufRead;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use crate::archive::{self, ArchiveSummary};
use crate::classify::IgnoreList;
use crate::closure::{Absorbed, ClosureBuilder};
use crate::config::PackConfig;
use crate::elf;
use crate::error::{Error, Result};
use crate::probe::{FilesystemProbe, SystemProbe};
use crate::provenance::{self, OwnershipQuery, ProvenanceSummary};
use crate::reduce::Closure;
use crate::search::{is_bare_name, SearchPath};

/// Counters describing how the input was absorbed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackReport {
    /// Non-empty input lines processed.
    pub candidates: usize,
    /// Candidates resolved through the search path.
    pub resolved: usize,
    /// Candidates skipped by the ignore-list.
    pub ignored: usize,
    /// Candidates that matched nothing on disk.
    pub discarded: usize,
    /// Symlink chains that looped back on themselves.
    pub cycles: usize,
    /// Files and symlinks in the finalized closure.
    pub files: usize,
    /// Needed directories in the finalized closure.
    pub directories: usize,
}

/// Absorbs a candidate stream into a closure.
///
/// # Examples
///
/// ```
/// use micropack::classify::IgnoreList;
/// use micropack::pack::Packer;
/// use micropack::probe::MemoryProbe;
/// use micropack::search::SearchPath;
/// use std::path::Path;
///
/// let probe = MemoryProbe::new()
///     .with_file("/lib/ld-musl-x86_64.so.1")
///     .with_file("/usr/bin/python3");
/// let mut packer = Packer::with_probe(
///     probe,
///     IgnoreList::default(),
///     SearchPath::new("/usr/bin"),
///     Path::new("/tmp"),
/// );
///
/// packer.seed_loader(Path::new("/lib/ld-musl-x86_64.so.1")).unwrap();
/// packer.absorb_lines("python3\n/proc/self/maps\nnot a path\n".as_bytes()).unwrap();
///
/// let (closure, report) = packer.finish();
/// assert!(closure.contains(Path::new("/usr/bin/python3")));
/// assert_eq!(report.resolved, 1);
/// assert_eq!(report.discarded, 2);
/// ```
#[derive(Debug)]
pub struct Packer<P = SystemProbe> {
    builder: ClosureBuilder<P>,
    search: SearchPath,
    scratch_dir: PathBuf,
    report: PackReport,
}

impl Packer<SystemProbe> {
    /// Create a packer over the real filesystem from a configuration.
    #[must_use]
    pub fn new(config: &PackConfig, search: SearchPath) -> Self {
        Self::with_probe(SystemProbe, config.ignore_list(), search, config.scratch_dir())
    }
}

impl<P: FilesystemProbe> Packer<P> {
    /// Create a packer over an arbitrary filesystem probe.
    #[must_use]
    pub fn with_probe(probe: P, ignore: IgnoreList, search: SearchPath, scratch_dir: &Path) -> Self {
        Self {
            builder: ClosureBuilder::with_probe(probe, ignore),
            search,
            scratch_dir: scratch_dir.to_path_buf(),
            report: PackReport::default(),
        }
    }

    /// Read the loader of `executable` and seed the closure with it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `MalformedBinary` if the loader cannot be read
    /// from `executable`, and `NotFound` if the loader itself is missing.
    pub fn seed_from_executable(&mut self, executable: &Path) -> Result<PathBuf> {
        let loader = elf::read_interpreter(executable)?;
        self.seed_loader(&loader)?;
        Ok(loader)
    }

    /// Seed the closure with a loader path.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing exists at `loader`, and `SymlinkCycle`
    /// if it is a looping symlink.
    pub fn seed_loader(&mut self, loader: &Path) -> Result<()> {
        match self.builder.absorb(loader)? {
            Absorbed::Discarded => Err(Error::NotFound {
                path: loader.to_path_buf(),
            }),
            Absorbed::Ignored => {
                log::warn!("loader {} is on the ignore-list", loader.display());
                Ok(())
            }
            _ => {
                log::info!("seeded closure with loader {}", loader.display());
                Ok(())
            }
        }
    }

    /// Absorb a single candidate, taken as-is.
    ///
    /// A candidate naming an existing path is absorbed unchanged; a bare name
    /// that exists nowhere locally is looked up on the search path. Anything
    /// else is discarded. Symlink cycles are logged and counted. An empty
    /// candidate is skipped without being counted.
    pub fn absorb_candidate<S: AsRef<OsStr>>(&mut self, candidate: S) {
        let token = candidate.as_ref();
        if token.is_empty() {
            return;
        }
        self.report.candidates += 1;

        let path = Path::new(token);
        let target = if self.builder.probe().exists(path) {
            Some(path.to_path_buf())
        } else if is_bare_name(token) {
            let found = self.search.resolve(token, self.builder.probe());
            if let Some(ref resolved) = found {
                log::debug!("resolved {} to {}", path.display(), resolved.display());
                self.report.resolved += 1;
            }
            found
        } else {
            None
        };

        let Some(target) = target else {
            log::debug!("discarding candidate {token:?}");
            self.report.discarded += 1;
            return;
        };

        match self.builder.absorb(&target) {
            Ok(Absorbed::Ignored) => self.report.ignored += 1,
            Ok(Absorbed::Discarded) => self.report.discarded += 1,
            Ok(_) => {}
            Err(e) => {
                log::warn!("{e}");
                self.report.cycles += 1;
            }
        }
    }

    /// Absorb every line of `input`.
    ///
    /// Lines are raw bytes; only the `\n` (or `\r\n`) terminator is removed.
    /// Lines that are not valid UTF-8 are absorbed like any other.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the stream cannot be read.
    pub fn absorb_lines<R: BufRead>(&mut self, mut input: R) -> Result<()> {
        let mut line = Vec::new();
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            self.absorb_candidate(OsStr::from_bytes(strip_terminator(&line)));
        }
    }

    /// Finalize the closure and complete the report.
    #[must_use]
    pub fn finish(self) -> (Closure, PackReport) {
        let mut report = self.report;
        let closure = self.builder.finalize(&self.scratch_dir);
        report.files = closure.files().len();
        report.directories = closure.directories().len();
        (closure, report)
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Everything a completed pack run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOutcome {
    /// The loader that seeded the closure.
    pub loader: PathBuf,
    /// The finalized closure.
    pub closure: Closure,
    /// Absorption counters.
    pub report: PackReport,
    /// What was written to the archive.
    pub archive: ArchiveSummary,
    /// Provenance counters, when a report was requested.
    pub provenance: Option<ProvenanceSummary>,
}

/// Seed, absorb and finalize without writing anything.
///
/// # Errors
///
/// Returns an error if the reference executable's loader cannot be read or
/// the input cannot be read.
pub fn collect<R: BufRead>(
    input: R,
    config: &PackConfig,
    search: SearchPath,
) -> Result<(PathBuf, Closure, PackReport)> {
    let mut packer = Packer::new(config, search);
    let loader = packer.seed_from_executable(config.interpreter())?;
    packer.absorb_lines(input)?;
    let (closure, report) = packer.finish();
    Ok((loader, closure, report))
}

/// Run the complete pipeline: collect, archive and annotate.
///
/// # Errors
///
/// Returns the errors of [`collect`], and any failure to write the archive
/// or the provenance report.
pub fn run<R: BufRead>(input: R, config: &PackConfig, search: SearchPath) -> Result<PackOutcome> {
    let managers = if config.wants_provenance() {
        provenance::detect(&search)
    } else {
        Vec::new()
    };

    let (loader, closure, report) = collect(input, config, search)?;
    let archive = archive::write_archive_file(config.output(), closure.entries())?;

    let provenance = if config.wants_provenance() {
        let queries: Vec<Box<dyn OwnershipQuery>> = managers
            .into_iter()
            .map(|m| Box::new(m) as Box<dyn OwnershipQuery>)
            .collect();
        Some(provenance::write_report(
            config.provenance_report(),
            &queries,
            closure.files(),
        )?)
    } else {
        None
    };

    Ok(PackOutcome {
        loader,
        closure,
        report,
        archive,
        provenance,
    })
}
