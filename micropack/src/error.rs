//! Error types for the micropack library.
//!
//! This module provides the error hierarchy for every stage of a pack run,
//! from reading the reference executable to writing the archive, using
//! `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a micropack error.
///
/// # Examples
///
/// ```
/// use micropack::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the micropack library.
#[derive(Debug, Error)]
pub enum Error {
    /// A path does not exist or is not of the expected kind.
    #[error("not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A file could not be parsed as an ELF executable, or it carries no
    /// interpreter entry.
    #[error("malformed binary {}: {reason}", path.display())]
    MalformedBinary {
        /// The offending file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A chain of symbolic links came back to a path already visited.
    #[error("symlink cycle detected at {}", path.display())]
    SymlinkCycle {
        /// The first path seen twice in the chain.
        path: PathBuf,
    },

    /// The search path could not be read from the environment.
    #[error("search path is not set (PATH environment variable missing)")]
    MissingSearchPath,

    /// An entry could not be written to the archive.
    #[error("failed to archive {}: {source}", path.display())]
    Archive {
        /// The entry being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A package manager ownership query failed.
    #[error("{manager} query failed for {}: {reason}", path.display())]
    ProvenanceQuery {
        /// The package manager that was queried.
        manager: String,
        /// The file that was being looked up.
        path: PathBuf,
        /// Why the query failed.
        reason: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if error indicates a path does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use micropack::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::NotFound { path: PathBuf::from("/nonexistent") };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if a pack run may log this error and move on to the next item.
    ///
    /// # Examples
    ///
    /// ```
    /// use micropack::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::SymlinkCycle { path: PathBuf::from("/a") };
    /// assert!(err.is_recoverable());
    /// assert!(!Error::MissingSearchPath.is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SymlinkCycle { .. } | Self::ProvenanceQuery { .. })
    }
}
