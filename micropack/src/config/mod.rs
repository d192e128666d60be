//! Configuration system for micropack.
//!
//! # Configuration Precedence
//!
//! Layers are merged from lowest to highest precedence:
//!
//! 1. Built-in defaults
//! 2. User config (`~/.micropack/config.yaml`)
//! 3. Project config (`micropack.yaml` in the working directory)
//! 4. An explicit config file (`--config FILE`)
//! 5. Environment variables (`MICROPACK_*`)
//! 6. Programmatic overrides (command-line flags)
//!
//! `ignore_paths` accumulates across every layer instead of being replaced.
//!
//! # Examples
//!
//! ```no_run
//! use micropack::config::{ConfigBuilder, PackConfig};
//!
//! let flags = PackConfig { unsafe_paths: Some(true), ..Default::default() };
//! let config = ConfigBuilder::new().with_config(flags).build().unwrap();
//! assert!(config.is_unsafe());
//! ```

pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, PROJECT_CONFIG_FILE};
pub use merger::ConfigMerger;
pub use schema::PackConfig;
pub use validator::ConfigValidator;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Assembles a [`PackConfig`] from every layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    working_dir: Option<PathBuf>,
    user_dir: Option<PathBuf>,
    config_file: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<PackConfig>,
}

impl ConfigBuilder {
    /// Create a builder with default discovery.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for `micropack.yaml` in `dir` instead of the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Read the user config from `dir/config.yaml` instead of the home directory.
    #[must_use]
    pub fn with_user_dir(mut self, dir: &Path) -> Self {
        self.user_dir = Some(dir.to_path_buf());
        self
    }

    /// Add an explicit configuration file above the discovered ones.
    #[must_use]
    pub fn with_config_file(mut self, path: Option<&Path>) -> Self {
        self.config_file = path.map(Path::to_path_buf);
        self
    }

    /// Apply programmatic overrides with the highest precedence.
    #[must_use]
    pub fn with_config(mut self, config: PackConfig) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Skip every configuration file.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Skip `MICROPACK_*` environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Merge all layers and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file cannot be loaded, an
    /// environment variable is malformed, or the merged result is invalid.
    pub fn build(self) -> Result<PackConfig> {
        let mut config = if self.skip_files {
            PackConfig::default()
        } else {
            let working_dir = match self.working_dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let sources = ConfigLoader::load_all(
                &working_dir,
                self.user_dir.as_deref(),
                self.config_file.as_deref(),
            )?;
            ConfigMerger::merge(sources)
        };

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        if let Some(ref overrides) = self.overrides {
            ConfigMerger::merge_into(&mut config, overrides);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
