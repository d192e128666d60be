//! Pack command implementation.
//!
//! Computes the closure of a trace and writes it as a tar archive,
//! optionally followed by a provenance report.

use super::ClosureArgs;
use crate::error::CliError;
use crate::utils::{load_configuration, open_input, search_path, GlobalOptions};
use clap::Args;
use micropack::pack;
use micropack::PackConfig;
use std::path::PathBuf;

/// Build the closure of a trace and write it as a tar archive.
#[derive(Args)]
pub struct PackCommand {
    #[command(flatten)]
    pub closure: ClosureArgs,

    /// Archive to write
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Ask the installed package managers who owns each file
    #[arg(long)]
    pub provenance: bool,

    /// Where to write the provenance report
    #[arg(long, value_name = "FILE")]
    pub provenance_report: Option<PathBuf>,
}

impl PackCommand {
    /// Command-line flags as a configuration layer.
    pub fn to_config(&self) -> PackConfig {
        PackConfig {
            output: self.output.clone(),
            provenance: self.provenance.then_some(true),
            provenance_report: self.provenance_report.clone(),
            ..self.closure.to_config()
        }
    }

    /// Execute the pack command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // 1. Resolve configuration and the search path
        let config = load_configuration(global, self.to_config())?;
        let search = search_path()?;

        // 2. Collect, archive and annotate
        let input = open_input(&self.closure.input)?;
        let outcome = pack::run(input, &config, search)?;

        // 3. Summarize
        if !global.quiet {
            let report = &outcome.report;
            eprintln!(
                "Packed {} entries ({} files, {} symlinks, {} directories) into {}",
                outcome.archive.total(),
                outcome.archive.files,
                outcome.archive.symlinks,
                outcome.archive.directories,
                config.output().display()
            );
            if global.verbose {
                eprintln!("  loader:     {}", outcome.loader.display());
                eprintln!("  candidates: {}", report.candidates);
                eprintln!("  resolved:   {}", report.resolved);
                eprintln!("  ignored:    {}", report.ignored);
                eprintln!("  discarded:  {}", report.discarded);
                eprintln!("  cycles:     {}", report.cycles);
            }
            if let Some(provenance) = outcome.provenance {
                eprintln!(
                    "Provenance: {} answered, {} unowned ({} managers) in {}",
                    provenance.answered,
                    provenance.failed,
                    provenance.sections,
                    config.provenance_report().display()
                );
            }
        }

        Ok(())
    }
}
