//! Interp command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, GlobalOptions};
use clap::Args;
use micropack::{read_interpreter, PackConfig};
use std::path::PathBuf;

/// Print the dynamic loader of an ELF executable.
#[derive(Args)]
pub struct InterpCommand {
    /// Executable to inspect (defaults to the configured reference executable)
    #[arg(value_name = "EXECUTABLE")]
    pub executable: Option<PathBuf>,
}

impl InterpCommand {
    /// Execute the interp command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let executable = match self.executable {
            Some(path) => path,
            None => load_configuration(global, PackConfig::default())?
                .interpreter()
                .to_path_buf(),
        };

        let loader = read_interpreter(&executable)?;
        println!("{}", loader.display());
        Ok(())
    }
}
