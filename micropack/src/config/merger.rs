//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::PackConfig;

/// Merges configuration layers according to precedence rules.
///
/// # Examples
///
/// ```
/// use micropack::config::{ConfigMerger, PackConfig};
///
/// let low = PackConfig { output: Some("low.tar".into()), ..Default::default() };
/// let high = PackConfig { output: Some("high.tar".into()), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.output, Some("high.tar".into()));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge sources, given from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> PackConfig {
        let mut result = PackConfig::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge `source` into `target`.
    ///
    /// Scalar fields are overwritten when set in `source`; `ignore_paths`
    /// accumulates across layers.
    pub fn merge_into(target: &mut PackConfig, source: &PackConfig) {
        if source.interpreter.is_some() {
            target.interpreter.clone_from(&source.interpreter);
        }

        if source.output.is_some() {
            target.output.clone_from(&source.output);
        }

        if let Some(ref extra) = source.ignore_paths {
            target
                .ignore_paths
                .get_or_insert_with(Vec::new)
                .extend(extra.iter().cloned());
        }

        if source.unsafe_paths.is_some() {
            target.unsafe_paths = source.unsafe_paths;
        }

        if source.scratch_dir.is_some() {
            target.scratch_dir.clone_from(&source.scratch_dir);
        }

        if source.provenance.is_some() {
            target.provenance = source.provenance;
        }

        if source.provenance_report.is_some() {
            target.provenance_report.clone_from(&source.provenance_report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_later_sources_win() {
        let sources = vec![
            ConfigSource {
                path: PathBuf::from("user.yaml"),
                precedence: 1,
                config: PackConfig {
                    interpreter: Some("/bin/bash".into()),
                    unsafe_paths: Some(true),
                    ..Default::default()
                },
            },
            ConfigSource {
                path: PathBuf::from("micropack.yaml"),
                precedence: 2,
                config: PackConfig {
                    interpreter: Some("/usr/bin/python3".into()),
                    ..Default::default()
                },
            },
        ];

        let merged = ConfigMerger::merge(sources);
        assert_eq!(merged.interpreter, Some("/usr/bin/python3".into()));
        assert_eq!(merged.unsafe_paths, Some(true));
    }

    #[test]
    fn test_ignore_paths_accumulate() {
        let mut target = PackConfig {
            ignore_paths: Some(vec!["/run".into()]),
            ..Default::default()
        };
        let source = PackConfig {
            ignore_paths: Some(vec!["/var/cache".into()]),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        assert_eq!(
            target.ignore_paths,
            Some(vec![PathBuf::from("/run"), PathBuf::from("/var/cache")])
        );
    }

    #[test]
    fn test_unset_fields_preserved() {
        let mut target = PackConfig {
            scratch_dir: Some("/var/tmp".into()),
            provenance: Some(true),
            ..Default::default()
        };
        ConfigMerger::merge_into(&mut target, &PackConfig::default());
        assert_eq!(target.scratch_dir, Some("/var/tmp".into()));
        assert_eq!(target.provenance, Some(true));
    }
}
