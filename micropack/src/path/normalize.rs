//! Lexical path normalization.
//!
//! Normalization never touches the filesystem beyond reading the current
//! directory. It:
//! - Converts relative paths to absolute paths
//! - Resolves `.` and `..` components
//! - Collapses redundant separators

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve `.` and `..` components and redundant separators.
///
/// A `..` at the root stays at the root, as the kernel does when walking
/// `/..`. A relative path keeps leading `..` components it cannot cancel.
///
/// # Examples
///
/// ```
/// use micropack::path::normalize::resolve_components;
/// use std::path::{Path, PathBuf};
///
/// let resolved = resolve_components(Path::new("/a/./b/../c"));
/// assert_eq!(resolved, PathBuf::from("/a/c"));
///
/// let resolved = resolve_components(Path::new("//usr///lib/"));
/// assert_eq!(resolved, PathBuf::from("/usr/lib"));
///
/// let resolved = resolve_components(Path::new("/../etc"));
/// assert_eq!(resolved, PathBuf::from("/etc"));
/// ```
#[must_use]
pub fn resolve_components(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    let mut has_root = false;
    // Number of leading ".." kept in a relative path.
    let mut leading_parents = 0usize;
    let mut normals = 0usize;

    for component in path.components() {
        match component {
            Component::RootDir | Component::Prefix(_) => {
                result.push(component.as_os_str());
                has_root = true;
            }
            Component::Normal(c) => {
                result.push(c);
                normals += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if normals > 0 {
                    result.pop();
                    normals -= 1;
                } else if !has_root {
                    result.push("..");
                    leading_parents += 1;
                }
            }
        }
    }

    if result.as_os_str().is_empty() && leading_parents == 0 {
        result.push(if has_root { "/" } else { "." });
    }

    result
}

/// Normalize a path to absolute form.
///
/// Relative paths are resolved against the current directory, then
/// `.` and `..` components are removed.
///
/// # Errors
///
/// Returns an error if the path is relative and the current directory
/// cannot be determined.
///
/// # Examples
///
/// ```
/// use micropack::path::normalize::normalize;
/// use std::path::Path;
///
/// let normalized = normalize(Path::new("/usr/bin/../lib/./ld.so")).unwrap();
/// assert_eq!(normalized, Path::new("/usr/lib/ld.so"));
/// ```
pub fn normalize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(resolve_components(path));
    }

    let cwd = env::current_dir().map_err(|e| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: format!("Cannot get current directory: {e}"),
    })?;
    Ok(resolve_components(&cwd.join(path)))
}

/// Resolve the target of a symbolic link to an absolute, normalized path.
///
/// Relative targets are interpreted against the directory that contains the
/// link itself.
///
/// # Examples
///
/// ```
/// use micropack::path::normalize::resolve_link_target;
/// use std::path::Path;
///
/// let target = resolve_link_target(
///     Path::new("/usr/lib/libz.so.1"),
///     Path::new("libz.so.1.3"),
/// );
/// assert_eq!(target, Path::new("/usr/lib/libz.so.1.3"));
///
/// let target = resolve_link_target(Path::new("/bin"), Path::new("usr/bin"));
/// assert_eq!(target, Path::new("/usr/bin"));
///
/// let target = resolve_link_target(
///     Path::new("/usr/bin/java"),
///     Path::new("/etc/alternatives/java"),
/// );
/// assert_eq!(target, Path::new("/etc/alternatives/java"));
/// ```
#[must_use]
pub fn resolve_link_target(link: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return resolve_components(target);
    }

    let base = link.parent().unwrap_or_else(|| Path::new("/"));
    resolve_components(&base.join(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_components_simple() {
        assert_eq!(
            resolve_components(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
    }

    #[test]
    fn test_resolve_components_multiple_parent() {
        assert_eq!(
            resolve_components(Path::new("/a/b/../../c")),
            PathBuf::from("/c")
        );
    }

    #[test]
    fn test_resolve_components_root_only() {
        assert_eq!(resolve_components(Path::new("/")), PathBuf::from("/"));
        assert_eq!(resolve_components(Path::new("/a/..")), PathBuf::from("/"));
    }

    #[test]
    fn test_resolve_components_parent_above_root() {
        assert_eq!(resolve_components(Path::new("/a/../..")), PathBuf::from("/"));
        assert_eq!(
            resolve_components(Path::new("/../../lib")),
            PathBuf::from("/lib")
        );
    }

    #[test]
    fn test_resolve_components_relative() {
        assert_eq!(
            resolve_components(Path::new("../x/./y")),
            PathBuf::from("../x/y")
        );
        assert_eq!(resolve_components(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_normalize_relative() {
        let cwd = env::current_dir().unwrap();
        let normalized = normalize(Path::new("relative/path")).unwrap();
        assert!(normalized.is_absolute());
        assert!(normalized.starts_with(&cwd));
        assert!(normalized.ends_with("relative/path"));
    }

    #[test]
    fn test_resolve_link_target_parent_dir() {
        assert_eq!(
            resolve_link_target(
                Path::new("/usr/lib64/ld-linux-x86-64.so.2"),
                Path::new("../lib/x86_64-linux-gnu/ld-linux-x86-64.so.2")
            ),
            PathBuf::from("/usr/lib/x86_64-linux-gnu/ld-linux-x86-64.so.2")
        );
    }

    #[test]
    fn test_resolve_link_target_dot() {
        assert_eq!(
            resolve_link_target(Path::new("/usr/bin/sh"), Path::new("./dash")),
            PathBuf::from("/usr/bin/dash")
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn path_with_dots_strategy() -> impl Strategy<Value = String> {
            prop::collection::vec(
                prop_oneof![
                    Just(".".to_string()),
                    Just("..".to_string()),
                    Just(String::new()),
                    "[a-zA-Z0-9_-]{1,10}".prop_map(|s| s),
                ],
                1..=8,
            )
            .prop_map(|parts| format!("/{}", parts.join("/")))
        }

        proptest! {
            #[test]
            fn resolve_components_idempotent(s in path_with_dots_strategy()) {
                let once = resolve_components(Path::new(&s));
                let twice = resolve_components(&once);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn resolve_components_preserves_absolute(s in path_with_dots_strategy()) {
                prop_assert!(resolve_components(Path::new(&s)).is_absolute());
            }

            #[test]
            fn resolve_components_no_dot_components(s in path_with_dots_strategy()) {
                let resolved = resolve_components(Path::new(&s));
                for component in resolved.components() {
                    prop_assert_ne!(component, Component::CurDir);
                    prop_assert_ne!(component, Component::ParentDir);
                }
            }
        }
    }
}
