//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CompletionsCommand, InterpCommand, ListCommand, PackCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for packing the minimal root filesystem of a workload.
#[derive(Parser)]
#[command(name = "micropack")]
#[command(
    version,
    about = "Pack the minimal root filesystem of a traced workload",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short = 'd', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Read configuration from this file (above micropack.yaml)
    #[arg(long, value_name = "FILE", global = true, env = "MICROPACK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Build the closure of a trace and write it as a tar archive
    Pack(PackCommand),

    /// Print the closure of a trace without writing an archive
    List(ListCommand),

    /// Print the dynamic loader of an ELF executable
    Interp(InterpCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pack_flags() {
        let cli = Cli::try_parse_from([
            "micropack",
            "pack",
            "-i",
            "trace.txt",
            "-o",
            "out.tar",
            "-x",
            "/usr/bin/java",
            "--ignore",
            "/run",
            "--ignore",
            "/var/cache",
            "-u",
            "-d",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Command::Pack(cmd) = cli.command else {
            panic!("expected pack");
        };
        let config = cmd.to_config();
        assert_eq!(config.output, Some(PathBuf::from("out.tar")));
        assert_eq!(config.interpreter, Some(PathBuf::from("/usr/bin/java")));
        assert_eq!(config.unsafe_paths, Some(true));
        assert_eq!(config.ignore_paths.map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_unset_flags_leave_config_alone() {
        let cli = Cli::try_parse_from(["micropack", "list", "-i", "-"]).unwrap();
        let Command::List(cmd) = cli.command else {
            panic!("expected list");
        };
        let config = cmd.closure.to_config();
        assert_eq!(config, micropack::PackConfig::default());
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["micropack", "pack"]).is_err());
    }
}
