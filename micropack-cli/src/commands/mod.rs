//! CLI command implementations.
//!
//! - `pack`: Build the closure of a trace and write it as a tar archive
//! - `list`: Print the closure without archiving it
//! - `interp`: Print the dynamic loader of an ELF executable
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod interp;
pub mod list;
pub mod pack;

pub use completions::CompletionsCommand;
pub use interp::InterpCommand;
pub use list::ListCommand;
pub use pack::PackCommand;

use clap::Args;
use micropack::PackConfig;
use std::path::PathBuf;

/// Arguments shared by every command that computes a closure.
#[derive(Args, Debug, Clone)]
pub struct ClosureArgs {
    /// File listing the paths the workload touched, one per line ("-" for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Reference executable whose dynamic loader seeds the closure
    #[arg(short = 'x', long, value_name = "PATH")]
    pub interpreter: Option<PathBuf>,

    /// Additional path prefix to leave out of the closure (repeatable)
    #[arg(long = "ignore", value_name = "PATH")]
    pub ignore: Vec<PathBuf>,

    /// Disable the ignore list entirely
    #[arg(short = 'u', long = "unsafe")]
    pub unsafe_paths: bool,

    /// Scratch directory to include in the image
    #[arg(long, value_name = "PATH")]
    pub scratch_dir: Option<PathBuf>,
}

impl ClosureArgs {
    /// Translate the flags into a configuration layer.
    ///
    /// Flags that were not given stay unset so lower layers show through.
    pub fn to_config(&self) -> PackConfig {
        PackConfig {
            interpreter: self.interpreter.clone(),
            ignore_paths: if self.ignore.is_empty() {
                None
            } else {
                Some(self.ignore.clone())
            },
            unsafe_paths: self.unsafe_paths.then_some(true),
            scratch_dir: self.scratch_dir.clone(),
            ..PackConfig::default()
        }
    }
}
