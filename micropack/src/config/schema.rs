//! Configuration schema definitions.
//!
//! Every field is optional so that partial files can be layered; the
//! accessors fall back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classify::IgnoreList;
use crate::reduce::DEFAULT_SCRATCH_DIR;

/// Default reference executable whose loader seeds the closure.
pub const DEFAULT_INTERPRETER: &str = "/bin/sh";

/// Default archive path.
pub const DEFAULT_OUTPUT: &str = "rootfs.tar";

/// Default provenance report path.
pub const DEFAULT_PROVENANCE_REPORT: &str = "provenance.txt";

/// Complete configuration structure for a pack run.
///
/// # Examples
///
/// ```
/// use micropack::config::PackConfig;
/// use std::path::Path;
///
/// let config = PackConfig {
///     output: Some("alpine.tar".into()),
///     ..Default::default()
/// };
/// assert_eq!(config.output(), Path::new("alpine.tar"));
/// assert_eq!(config.interpreter(), Path::new("/bin/sh"));
/// assert!(!config.is_unsafe());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackConfig {
    /// Reference executable whose dynamic loader is always included.
    pub interpreter: Option<PathBuf>,

    /// Archive to write.
    pub output: Option<PathBuf>,

    /// Extra ignore-list prefixes, added to the built-in ones.
    #[serde(default)]
    pub ignore_paths: Option<Vec<PathBuf>>,

    /// Disable all ignore-list filtering.
    pub unsafe_paths: Option<bool>,

    /// Scratch directory guaranteed to exist in the image.
    pub scratch_dir: Option<PathBuf>,

    /// Write a package provenance report.
    pub provenance: Option<bool>,

    /// Where the provenance report goes.
    pub provenance_report: Option<PathBuf>,
}

impl PackConfig {
    /// Reference executable, or `/bin/sh`.
    #[must_use]
    pub fn interpreter(&self) -> &Path {
        self.interpreter
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_INTERPRETER))
    }

    /// Output archive, or `rootfs.tar`.
    #[must_use]
    pub fn output(&self) -> &Path {
        self.output
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT))
    }

    /// Scratch directory, or `/tmp`.
    #[must_use]
    pub fn scratch_dir(&self) -> &Path {
        self.scratch_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SCRATCH_DIR))
    }

    /// Provenance report path, or `provenance.txt`.
    #[must_use]
    pub fn provenance_report(&self) -> &Path {
        self.provenance_report
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_PROVENANCE_REPORT))
    }

    /// Whether ignore-list filtering is disabled.
    #[must_use]
    pub fn is_unsafe(&self) -> bool {
        self.unsafe_paths.unwrap_or(false)
    }

    /// Whether a provenance report was requested.
    #[must_use]
    pub fn wants_provenance(&self) -> bool {
        self.provenance.unwrap_or(false)
    }

    /// Build the effective ignore-list.
    ///
    /// # Examples
    ///
    /// ```
    /// use micropack::config::PackConfig;
    /// use std::path::Path;
    ///
    /// let config = PackConfig {
    ///     ignore_paths: Some(vec!["/run".into()]),
    ///     ..Default::default()
    /// };
    /// let ignore = config.ignore_list();
    /// assert!(ignore.is_ignored(Path::new("/run/lock")));
    /// assert!(ignore.is_ignored(Path::new("/proc/1")));
    /// ```
    #[must_use]
    pub fn ignore_list(&self) -> IgnoreList {
        if self.is_unsafe() {
            return IgnoreList::disabled();
        }
        IgnoreList::default().with_prefixes(self.ignore_paths.iter().flatten().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PackConfig::default();
        assert_eq!(config.interpreter(), Path::new("/bin/sh"));
        assert_eq!(config.output(), Path::new("rootfs.tar"));
        assert_eq!(config.scratch_dir(), Path::new("/tmp"));
        assert_eq!(config.provenance_report(), Path::new("provenance.txt"));
        assert!(!config.is_unsafe());
        assert!(!config.wants_provenance());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r"
interpreter: /usr/bin/java
output: out/jre.tar
ignore_paths:
  - /run
  - /var/cache
scratch_dir: /var/tmp
provenance: true
";
        let config: PackConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.interpreter(), Path::new("/usr/bin/java"));
        assert_eq!(config.output(), Path::new("out/jre.tar"));
        assert_eq!(config.scratch_dir(), Path::new("/var/tmp"));
        assert_eq!(config.ignore_paths.as_ref().map(Vec::len), Some(2));
        assert!(config.wants_provenance());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<PackConfig, _> = serde_yaml::from_str("excl_files: [/a]\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unsafe_disables_ignore_list() {
        let config = PackConfig {
            unsafe_paths: Some(true),
            ignore_paths: Some(vec!["/run".into()]),
            ..Default::default()
        };
        let ignore = config.ignore_list();
        assert!(!ignore.is_enabled());
        assert!(!ignore.is_ignored(Path::new("/proc/self")));
    }
}
