//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use micropack::Error as LibError;
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// I/O error.
    Io(std::io::Error),

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 2: Reference executable or its loader unreadable or malformed
    /// - 3: Search path missing from the environment
    /// - 4: Invalid path argument
    /// - 5: I/O error (input, output, archive)
    /// - 6: Other library error
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => match lib_err {
                LibError::NotFound { .. } | LibError::MalformedBinary { .. } => 2,
                LibError::MissingSearchPath => 3,
                LibError::InvalidPath { .. } => 4,
                LibError::Archive { .. } | LibError::Io(_) => 5,
                LibError::Configuration(_) | LibError::Validation { .. } => 7,
                _ => 6,
            },
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        CliError::Library(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let malformed = CliError::from(LibError::MalformedBinary {
            path: PathBuf::from("/bin/sh"),
            reason: "bad magic".into(),
        });
        assert_eq!(malformed.exit_code(), 2);
        assert_eq!(CliError::from(LibError::MissingSearchPath).exit_code(), 3);
        let invalid = CliError::from(LibError::InvalidPath {
            path: PathBuf::from("bin/../.."),
            reason: "escapes the root".into(),
        });
        assert_eq!(invalid.exit_code(), 4);

        let archive = CliError::from(LibError::Archive {
            path: PathBuf::from("/etc/hosts"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        assert_eq!(archive.exit_code(), 5);
        assert_eq!(
            CliError::from(std::io::Error::new(std::io::ErrorKind::Other, "x")).exit_code(),
            5
        );

        let cycle = CliError::from(LibError::SymlinkCycle {
            path: PathBuf::from("/a"),
        });
        assert_eq!(cycle.exit_code(), 6);
        assert_eq!(CliError::Config("bad".into()).exit_code(), 7);
    }
}
