//! Environment variable handling for configuration overrides.
//!
//! `MICROPACK_*` variables override every configuration file.

use crate::config::schema::PackConfig;
use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use micropack::config::{EnvironmentConfig, PackConfig};
///
/// let mut config = PackConfig::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply `MICROPACK_*` overrides to `config`.
    ///
    /// `MICROPACK_IGNORE_PATHS` is colon separated and adds to the existing
    /// ignore paths rather than replacing them.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unparseable boolean.
    pub fn apply_overrides(config: &mut PackConfig) -> Result<()> {
        if let Some(path) = Self::path_var("MICROPACK_INTERPRETER") {
            config.interpreter = Some(path);
        }

        if let Some(path) = Self::path_var("MICROPACK_OUTPUT") {
            config.output = Some(path);
        }

        if let Ok(paths) = env::var("MICROPACK_IGNORE_PATHS") {
            let extra = paths
                .split(':')
                .filter(|p| !p.is_empty())
                .map(PathBuf::from);
            config
                .ignore_paths
                .get_or_insert_with(Vec::new)
                .extend(extra);
        }

        if let Ok(val) = env::var("MICROPACK_UNSAFE") {
            config.unsafe_paths = Some(Self::parse_bool("MICROPACK_UNSAFE", &val)?);
        }

        if let Some(path) = Self::path_var("MICROPACK_SCRATCH_DIR") {
            config.scratch_dir = Some(path);
        }

        if let Ok(val) = env::var("MICROPACK_PROVENANCE") {
            config.provenance = Some(Self::parse_bool("MICROPACK_PROVENANCE", &val)?);
        }

        if let Some(path) = Self::path_var("MICROPACK_PROVENANCE_REPORT") {
            config.provenance_report = Some(path);
        }

        Ok(())
    }

    fn path_var(key: &str) -> Option<PathBuf> {
        env::var_os(key).map(PathBuf::from)
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes for true, false/0/no for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!("Invalid boolean value: '{s}' (expected true/false/1/0/yes/no)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 7] = [
        "MICROPACK_INTERPRETER",
        "MICROPACK_OUTPUT",
        "MICROPACK_IGNORE_PATHS",
        "MICROPACK_UNSAFE",
        "MICROPACK_SCRATCH_DIR",
        "MICROPACK_PROVENANCE",
        "MICROPACK_PROVENANCE_REPORT",
    ];

    fn clear() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_parse_bool_variants() {
        for v in ["true", "TRUE", "1", "yes", "Yes"] {
            assert!(EnvironmentConfig::parse_bool("test", v).unwrap());
        }
        for v in ["false", "False", "0", "no", "NO"] {
            assert!(!EnvironmentConfig::parse_bool("test", v).unwrap());
        }
    }

    #[test]
    fn test_parse_bool_invalid() {
        let err = EnvironmentConfig::parse_bool("MICROPACK_UNSAFE", "maybe").unwrap_err();
        assert!(format!("{err}").contains("MICROPACK_UNSAFE"));
    }

    #[test]
    #[serial]
    fn test_overrides_applied() {
        clear();
        env::set_var("MICROPACK_OUTPUT", "/srv/out.tar");
        env::set_var("MICROPACK_UNSAFE", "yes");
        env::set_var("MICROPACK_SCRATCH_DIR", "/var/tmp");

        let mut config = PackConfig {
            output: Some("file.tar".into()),
            ..Default::default()
        };
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        clear();

        assert_eq!(config.output, Some("/srv/out.tar".into()));
        assert_eq!(config.unsafe_paths, Some(true));
        assert_eq!(config.scratch_dir, Some("/var/tmp".into()));
        assert_eq!(config.interpreter, None);
    }

    #[test]
    #[serial]
    fn test_ignore_paths_accumulate() {
        clear();
        env::set_var("MICROPACK_IGNORE_PATHS", "/run::/var/cache");

        let mut config = PackConfig {
            ignore_paths: Some(vec!["/srv/secrets".into()]),
            ..Default::default()
        };
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        clear();

        assert_eq!(
            config.ignore_paths,
            Some(vec![
                PathBuf::from("/srv/secrets"),
                PathBuf::from("/run"),
                PathBuf::from("/var/cache")
            ])
        );
    }

    #[test]
    #[serial]
    fn test_invalid_boolean_is_error() {
        clear();
        env::set_var("MICROPACK_PROVENANCE", "sometimes");

        let mut config = PackConfig::default();
        let result = EnvironmentConfig::apply_overrides(&mut config);
        clear();

        assert!(matches!(result, Err(Error::Validation { .. })));
    }
}
