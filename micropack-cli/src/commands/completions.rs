//! Shell completion generation command.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary (the package is `micropack-cli`).
const BIN_NAME: &str = "micropack";

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    ///
    /// The script goes to stdout; installation hints go to stderr so the
    /// output can be redirected straight into a completions file.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        if !global.quiet {
            for line in install_hint(self.shell) {
                eprintln!("# {line}");
            }
            eprintln!();
        }

        generate(self.shell, &mut Cli::command(), BIN_NAME, &mut io::stdout());
        Ok(())
    }
}

fn install_hint(shell: Shell) -> Vec<String> {
    match shell {
        Shell::Bash => vec![
            format!("{BIN_NAME} completions bash > ~/.local/share/bash-completion/completions/{BIN_NAME}"),
            format!("or in ~/.bashrc: eval \"$({BIN_NAME} completions bash)\""),
        ],
        Shell::Zsh => vec![
            format!("{BIN_NAME} completions zsh > ~/.zsh/completions/_{BIN_NAME}"),
            "with ~/.zsh/completions in $fpath".to_string(),
        ],
        Shell::Fish => vec![format!(
            "{BIN_NAME} completions fish > ~/.config/fish/completions/{BIN_NAME}.fish"
        )],
        Shell::PowerShell => vec![format!(
            "{BIN_NAME} completions powershell | Out-String | Invoke-Expression"
        )],
        _ => Vec::new(),
    }
}
