//! Common test utilities for CLI integration tests.
//!
//! Every test runs the binary inside its own temporary tree:
//! - a synthesized ELF reference executable and its loader
//! - a scratch directory and a few data files
//! - an isolated `HOME` and working directory, so no real configuration leaks in

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ENV_KEYS: [&str; 10] = [
    "MICROPACK_INTERPRETER",
    "MICROPACK_OUTPUT",
    "MICROPACK_IGNORE_PATHS",
    "MICROPACK_UNSAFE",
    "MICROPACK_SCRATCH_DIR",
    "MICROPACK_PROVENANCE",
    "MICROPACK_PROVENANCE_REPORT",
    "MICROPACK_CONFIG",
    "MICROPACK_LOG_MODE",
    "MICROPACK_OUTPUT_FORMAT",
];

/// Isolated tree with a packable workload.
pub struct TestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Root of the tree.
    pub root: PathBuf,
    /// Loader named by the reference executable.
    pub loader: PathBuf,
    /// Reference executable.
    pub app: PathBuf,
    /// Scratch directory passed on the command line.
    pub scratch: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();

        let env = Self {
            loader: root.join("lib/ld-musl-x86_64.so.1"),
            app: root.join("bin/app"),
            scratch: root.join("scratch"),
            root,
            temp_dir,
        };
        env.write("lib/ld-musl-x86_64.so.1", b"loader");
        env.write(
            "bin/app",
            &micropack::elf::synthesize_elf64_le(&env.loader.to_string_lossy()),
        );
        fs::create_dir_all(&env.scratch).unwrap();
        fs::create_dir_all(env.root.join("home")).unwrap();
        env
    }

    /// The binary with an isolated environment and working directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("micropack").expect("Failed to find micropack binary");
        cmd.current_dir(&self.root).env("HOME", self.root.join("home"));
        for key in ENV_KEYS {
            cmd.env_remove(key);
        }
        cmd
    }

    /// `command()` plus the subcommand and the flags that make the tree
    /// packable despite living under the default-ignored `/tmp`.
    pub fn closure_command(&self, subcommand: &str, input: &Path) -> Command {
        let mut cmd = self.command();
        cmd.arg(subcommand)
            .arg("-i")
            .arg(input)
            .arg("-x")
            .arg(&self.app)
            .arg("--unsafe")
            .arg("--scratch-dir")
            .arg(&self.scratch);
        cmd
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write a trace listing `paths`, one per line.
    pub fn trace<P: AsRef<Path>>(&self, paths: &[P]) -> PathBuf {
        let contents: String = paths
            .iter()
            .map(|p| format!("{}\n", p.as_ref().display()))
            .collect();
        self.write("trace.txt", contents.as_bytes())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
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
