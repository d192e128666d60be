//! Configuration file discovery and loading.

use crate::config::schema::PackConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project configuration file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "micropack.yaml";

/// Name of the per-user configuration directory under `$HOME`.
pub const USER_CONFIG_DIR: &str = ".micropack";

/// Configuration source with its precedence level.
///
/// Lower precedence values are overridden by higher ones.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed configuration.
    pub config: PackConfig,
}

/// Loads configuration from the user, project and explicit files.
///
/// # Examples
///
/// ```no_run
/// use micropack::config::ConfigLoader;
/// use std::path::Path;
///
/// let sources = ConfigLoader::load_all(Path::new("."), None, None).unwrap();
/// println!("Found {} configuration sources", sources.len());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Discover and load all configuration files.
    ///
    /// Loads, in increasing precedence:
    /// 1. `~/.micropack/config.yaml`, or `{user_dir}/config.yaml` when given
    /// 2. `micropack.yaml` in `working_dir`
    /// 3. `explicit`, which must exist when given
    ///
    /// # Errors
    ///
    /// Returns an error if a discovered file cannot be read or parsed, or if
    /// the explicit file is missing.
    pub fn load_all(
        working_dir: &Path,
        user_dir: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Vec<ConfigSource>> {
        let mut sources = Vec::new();

        let user_config = match user_dir {
            Some(dir) => Some(dir.join("config.yaml")),
            None => Self::user_config_path(),
        };
        if let Some(path) = user_config.filter(|p| p.exists()) {
            sources.push(Self::load_source(path, 1)?);
        }

        let project = working_dir.join(PROJECT_CONFIG_FILE);
        if project.exists() {
            sources.push(Self::load_source(project, 2)?);
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::NotFound {
                    path: path.to_path_buf(),
                });
            }
            sources.push(Self::load_source(path.to_path_buf(), 3)?);
        }

        sources.sort_by_key(|s| s.precedence);
        for source in &sources {
            log::debug!("loaded configuration from {}", source.path.display());
        }
        Ok(sources)
    }

    /// Load and parse a YAML configuration file.
    ///
    /// An empty file is an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the file cannot be read and `Configuration`
    /// if the YAML is invalid.
    pub fn load_file(path: &Path) -> Result<PackConfig> {
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read configuration file: {e}"),
        })?;

        if contents.trim().is_empty() {
            return Ok(PackConfig::default());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Path of the per-user configuration file, if a home directory exists.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(USER_CONFIG_DIR).join("config.yaml"))
    }

    fn load_source(path: PathBuf, precedence: u8) -> Result<ConfigSource> {
        let config = Self::load_file(&path)?;
        Ok(ConfigSource {
            path,
            precedence,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load_file(Path::new("/nonexistent/path/config.yaml"));
        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.yaml");
        fs::write(&config_path, "output: [unclosed").unwrap();

        let result = ConfigLoader::load_file(&config_path);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_load_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("empty.yaml");
        fs::write(&config_path, "\n").unwrap();

        assert_eq!(
            ConfigLoader::load_file(&config_path).unwrap(),
            PackConfig::default()
        );
    }

    #[test]
    fn test_load_all_precedence_order() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(user.path().join("config.yaml"), "output: user.tar\n").unwrap();
        fs::write(project.path().join(PROJECT_CONFIG_FILE), "output: project.tar\n").unwrap();
        let explicit = project.path().join("ci.yaml");
        fs::write(&explicit, "output: ci.tar\n").unwrap();

        let sources =
            ConfigLoader::load_all(project.path(), Some(user.path()), Some(&explicit)).unwrap();
        let outputs: Vec<_> = sources
            .iter()
            .map(|s| s.config.output.clone().unwrap())
            .collect();
        assert_eq!(
            outputs,
            [
                PathBuf::from("user.tar"),
                PathBuf::from("project.tar"),
                PathBuf::from("ci.tar")
            ]
        );
    }

    #[test]
    fn test_load_all_without_files() {
        let empty = TempDir::new().unwrap();
        let sources = ConfigLoader::load_all(empty.path(), Some(empty.path()), None).unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let empty = TempDir::new().unwrap();
        let missing = empty.path().join("nope.yaml");
        let result = ConfigLoader::load_all(empty.path(), Some(empty.path()), Some(&missing));
        assert!(result.unwrap_err().is_not_found());
    }
}
