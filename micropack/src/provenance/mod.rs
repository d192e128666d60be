//! Best-effort provenance annotation.
//!
//! After a closure is finalized, each included file can be attributed to the
//! package that installed it by asking whatever package managers are present
//! on the search path. The result is a plain-text report with one section per
//! manager; it never influences the closure itself.
//!
//! Lookups go through the [`OwnershipQuery`] capability so the report logic is
//! independent of any particular tool.

mod managers;

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub use managers::{detect, ManagerSpec, PackageManager, KNOWN_MANAGERS};

use crate::error::Result;

/// Capability to resolve the package owning a file.
#[cfg_attr(test, mockall::automock)]
pub trait OwnershipQuery {
    /// Short name of the package manager, used as the report section title.
    fn manager(&self) -> &'static str;

    /// Return the manager's raw answer for `path`.
    ///
    /// # Errors
    ///
    /// Returns `ProvenanceQuery` if the tool cannot be run or reports a
    /// failure (typically: the file belongs to no package).
    fn owner(&self, path: &Path) -> Result<String>;
}

/// Outcome of an annotation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvenanceSummary {
    /// Managers that contributed a section.
    pub sections: usize,
    /// Successful lookups across all managers.
    pub answered: usize,
    /// Lookups that failed and were skipped.
    pub failed: usize,
}

/// Write a provenance report for `files` to `out`.
///
/// Each manager contributes a `== name ==` header followed by its answers,
/// verbatim, in file order. A failed lookup is logged and skipped.
///
/// # Errors
///
/// Only failures to write to `out` are returned.
pub fn annotate<W: Write>(
    out: &mut W,
    queries: &[Box<dyn OwnershipQuery>],
    files: &BTreeSet<PathBuf>,
) -> Result<ProvenanceSummary> {
    let mut summary = ProvenanceSummary::default();

    for query in queries {
        writeln!(out, "== {} ==", query.manager())?;
        summary.sections += 1;

        for file in files {
            match query.owner(file) {
                Ok(answer) => {
                    out.write_all(answer.as_bytes())?;
                    if !answer.is_empty() && !answer.ends_with('\n') {
                        writeln!(out)?;
                    }
                    summary.answered += 1;
                }
                Err(e) => {
                    log::debug!("{e}");
                    summary.failed += 1;
                }
            }
        }
    }

    Ok(summary)
}

/// Create `report` and write the provenance of `files` into it.
///
/// # Errors
///
/// Returns `Io` if the report cannot be created or written.
pub fn write_report(
    report: &Path,
    queries: &[Box<dyn OwnershipQuery>],
    files: &BTreeSet<PathBuf>,
) -> Result<ProvenanceSummary> {
    if queries.is_empty() {
        log::warn!("no package manager found; provenance report will be empty");
    }

    let mut out = BufWriter::new(File::create(report)?);
    let summary = annotate(&mut out, queries, files)?;
    out.flush()?;

    log::info!(
        "provenance report {}: {} answers, {} failed lookups",
        report.display(),
        summary.answered,
        summary.failed
    );
    Ok(summary)
}
