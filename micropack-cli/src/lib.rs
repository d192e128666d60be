//! Library exports for micropack-cli.
//!
//! Exposes the CLI structure so integration tests and tooling can inspect
//! the command tree.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
