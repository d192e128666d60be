//! List command implementation.
//!
//! This module implements the `list` command, which prints the closure of a
//! trace in the order it would be archived, without writing an archive.

use super::ClosureArgs;
use crate::error::CliError;
use crate::utils::{load_configuration, open_input, search_path, GlobalOptions};
use clap::{Args, ValueEnum};
use micropack::pack::{self, PackReport};
use micropack::Closure;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Print the closure of a trace without writing an archive.
#[derive(Args)]
pub struct ListCommand {
    #[command(flatten)]
    pub closure: ClosureArgs,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "plain",
        env = "MICROPACK_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

/// Output format for list command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One path per line, directories first
    Plain,
    /// JSON document with the loader, entries and counters
    Json,
}

/// JSON shape of a listed closure.
#[derive(Serialize)]
struct Listing<'a> {
    loader: &'a Path,
    directories: Vec<&'a Path>,
    files: Vec<&'a Path>,
    candidates: usize,
    resolved: usize,
    ignored: usize,
    discarded: usize,
    cycles: usize,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global, self.closure.to_config())?;
        let search = search_path()?;

        let input = open_input(&self.closure.input)?;
        let (loader, closure, report) = pack::collect(input, &config, search)?;

        match self.format {
            OutputFormat::Plain => format_as_plain(&closure),
            OutputFormat::Json => format_as_json(&loader, &closure, &report),
        }
    }
}

fn format_as_plain(closure: &Closure) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for entry in closure.entries() {
        writeln!(handle, "{}", entry.display())?;
    }
    Ok(())
}

fn format_as_json(loader: &Path, closure: &Closure, report: &PackReport) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let listing = Listing {
        loader,
        directories: closure.directories().iter().map(|p| p.as_path()).collect(),
        files: closure.files().iter().map(|p| p.as_path()).collect(),
        candidates: report.candidates,
        resolved: report.resolved,
        ignored: report.ignored,
        discarded: report.discarded,
        cycles: report.cycles,
    };

    serde_json::to_writer_pretty(&mut handle, &listing)
        .map_err(|e| CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    writeln!(handle)?;

    Ok(())
}
