//! Utility functions for CLI operations.
//!
//! Shared by the commands: global options, configuration loading, the
//! search path and the candidate input stream.

use crate::error::CliError;
use micropack::{ConfigBuilder, Error as LibError, PackConfig, SearchPath};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Command-line flags (`overrides`, highest priority)
/// 2. Environment variables
/// 3. The `--config` file, then `micropack.yaml`, then the user config
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(
    global: &GlobalOptions,
    overrides: PackConfig,
) -> Result<PackConfig, CliError> {
    ConfigBuilder::new()
        .with_config_file(global.config.as_deref())
        .with_config(overrides)
        .build()
        .map_err(|e| match e {
            LibError::Io(io) => CliError::Io(io),
            other => CliError::Config(other.to_string()),
        })
}

/// Capture the search path from `PATH`.
pub fn search_path() -> Result<SearchPath, CliError> {
    SearchPath::from_env().map_err(CliError::from)
}

/// Open the candidate stream; `-` means standard input.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, CliError> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(path).map_err(|e| {
        CliError::Io(io::Error::new(
            e.kind(),
            format!("cannot open input {}: {e}", path.display()),
        ))
    })?;
    Ok(Box::new(BufReader::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_open_missing_input() {
        let err = match open_input(Path::new("/nonexistent/trace.txt")) {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("/nonexistent/trace.txt"));
    }

    #[test]
    fn test_open_file_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.txt");
        std::fs::write(&path, "/bin/ls\n").unwrap();

        let mut contents = String::new();
        open_input(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "/bin/ls\n");
    }
}
