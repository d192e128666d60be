//! Common test utilities for integration tests.
//!
//! Integration tests work on a scratch tree inside a temporary directory.
//! Temporary directories usually live under `/tmp`, which the default
//! ignore-list excludes, so suites either disable filtering or build their
//! own ignore-list.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A throwaway directory tree with helpers to populate it.
pub struct Fixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Absolute root of the tree.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn file(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    #[cfg(unix)]
    pub fn symlink(&self, rel: &str, target: impl AsRef<Path>) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(target, &path).unwrap();
        path
    }

    /// Write an ELF executable whose interpreter is `loader`.
    pub fn executable(&self, rel: &str, loader: &Path) -> PathBuf {
        let image = micropack::elf::synthesize_elf64_le(&loader.to_string_lossy());
        self.file(rel, &image)
    }

    /// Input stream listing `paths`, one per line.
    pub fn input<P: AsRef<Path>>(paths: &[P]) -> String {
        paths
            .iter()
            .map(|p| format!("{}\n", p.as_ref().display()))
            .collect()
    }
}

/// Names of the entries in a tar archive, in order.
#[allow(dead_code)]
pub fn archive_names(bytes: &[u8]) -> Vec<PathBuf> {
    let mut archive = tar::Archive::new(bytes);
    archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().into_owned())
        .collect()
}

/// Strip the leading `/` the way archive entry names do.
#[allow(dead_code)]
pub fn entry_name(path: &Path) -> PathBuf {
    path.strip_prefix("/").unwrap().to_path_buf()
}
