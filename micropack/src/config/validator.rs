//! Configuration validation.

use crate::config::schema::PackConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use micropack::config::{ConfigValidator, PackConfig};
///
/// ConfigValidator::validate(&PackConfig::default()).unwrap();
///
/// let bad = PackConfig { scratch_dir: Some("tmp".into()), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if an ignore path or the scratch directory is
    /// relative, or if an output path is empty.
    pub fn validate(config: &PackConfig) -> Result<()> {
        if let Some(ref paths) = config.ignore_paths {
            for path in paths {
                Self::require_absolute("ignore_paths", path)?;
            }
        }

        if let Some(ref scratch) = config.scratch_dir {
            Self::require_absolute("scratch_dir", scratch)?;
        }

        if let Some(ref output) = config.output {
            Self::require_non_empty("output", output)?;
        }

        if let Some(ref interpreter) = config.interpreter {
            Self::require_non_empty("interpreter", interpreter)?;
        }

        if let Some(ref report) = config.provenance_report {
            Self::require_non_empty("provenance_report", report)?;
        }

        Ok(())
    }

    fn require_absolute(field: &str, path: &Path) -> Result<()> {
        if path.is_absolute() {
            Ok(())
        } else {
            Err(Error::Validation {
                field: field.into(),
                message: format!("'{}' must be an absolute path", path.display()),
            })
        }
    }

    fn require_non_empty(field: &str, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            Err(Error::Validation {
                field: field.into(),
                message: "path cannot be empty".into(),
            })
        } else {
            Ok(())
        }
    }
}
