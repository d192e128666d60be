//! Package managers reachable through their command-line tools.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::OwnershipQuery;
use crate::error::{Error, Result};
use crate::search::SearchPath;

/// A package manager known to answer "which package owns this file".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerSpec {
    /// Name used for the report section.
    pub name: &'static str,
    /// Executable looked up on the search path.
    pub program: &'static str,
    /// Arguments placed before the queried path.
    pub args: &'static [&'static str],
}

/// Supported managers, in detection priority order.
pub const KNOWN_MANAGERS: [ManagerSpec; 3] = [
    ManagerSpec {
        name: "rpm",
        program: "rpm",
        args: &["-qf"],
    },
    ManagerSpec {
        name: "dpkg",
        program: "dpkg",
        args: &["-S"],
    },
    ManagerSpec {
        name: "apk",
        program: "apk",
        args: &["info", "--who-owns"],
    },
];

/// A detected package manager, bound to the executable that was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManager {
    spec: ManagerSpec,
    program: PathBuf,
}

impl PackageManager {
    /// Bind a manager to a specific executable.
    #[must_use]
    pub fn new(spec: ManagerSpec, program: impl Into<PathBuf>) -> Self {
        Self {
            spec,
            program: program.into(),
        }
    }

    /// The resolved executable.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn query_error(&self, path: &Path, reason: String) -> Error {
        Error::ProvenanceQuery {
            manager: self.spec.name.to_string(),
            path: path.to_path_buf(),
            reason,
        }
    }
}

impl OwnershipQuery for PackageManager {
    fn manager(&self) -> &'static str {
        self.spec.name
    }

    fn owner(&self, path: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .args(self.spec.args)
            .arg(path)
            .output()
            .map_err(|e| self.query_error(path, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.query_error(
                path,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Find every known package manager present on `search`, in priority order.
///
/// A missing tool is not an error; it is simply left out.
#[must_use]
pub fn detect(search: &SearchPath) -> Vec<PackageManager> {
    KNOWN_MANAGERS
        .iter()
        .filter_map(|spec| {
            match which::which_in(spec.program, Some(search.as_str()), "/") {
                Ok(program) => {
                    log::debug!("found {} at {}", spec.name, program.display());
                    Some(PackageManager::new(*spec, program))
                }
                Err(_) => {
                    log::debug!("{} not found on search path", spec.name);
                    None
                }
            }
        })
        .collect()
}
