//! Build script for micropack-cli.
//!
//! Renders the `micropack.1` man page into OUT_DIR with clap_mangen.
//! Build scripts cannot depend on the crate being built, so the command
//! tree is restated here.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Arguments shared by `pack` and `list`.
///
/// Keep in sync with `ClosureArgs` in src/commands/mod.rs.
fn closure_args() -> Vec<Arg> {
    vec![
        Arg::new("input")
            .short('i')
            .long("input")
            .value_name("FILE")
            .required(true)
            .help("File listing the paths the workload touched, one per line (\"-\" for stdin)"),
        Arg::new("interpreter")
            .short('x')
            .long("interpreter")
            .value_name("PATH")
            .help("Reference executable whose dynamic loader seeds the closure"),
        Arg::new("ignore")
            .long("ignore")
            .value_name("PATH")
            .action(ArgAction::Append)
            .help("Additional path prefix to leave out of the closure (repeatable)"),
        Arg::new("unsafe")
            .short('u')
            .long("unsafe")
            .action(ArgAction::SetTrue)
            .help("Disable the ignore list entirely"),
        Arg::new("scratch-dir")
            .long("scratch-dir")
            .value_name("PATH")
            .help("Scratch directory to include in the image"),
    ]
}

/// Build the CLI command structure for man page generation.
///
/// Keep synchronized with src/cli.rs.
fn build_cli() -> Command {
    Command::new("micropack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pack the minimal root filesystem of a traced workload")
        .arg(
            Arg::new("verbose")
                .short('d')
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Read configuration from this file (above micropack.yaml)")
                .global(true)
                .env("MICROPACK_CONFIG"),
        )
        .subcommands(vec![
            Command::new("pack")
                .about("Build the closure of a trace and write it as a tar archive")
                .args(closure_args())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Archive to write"),
                )
                .arg(
                    Arg::new("provenance")
                        .long("provenance")
                        .action(ArgAction::SetTrue)
                        .help("Ask the installed package managers who owns each file"),
                )
                .arg(
                    Arg::new("provenance-report")
                        .long("provenance-report")
                        .value_name("FILE")
                        .help("Where to write the provenance report"),
                ),
            Command::new("list")
                .about("Print the closure of a trace without writing an archive")
                .args(closure_args())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["plain", "json"])
                        .default_value("plain")
                        .env("MICROPACK_OUTPUT_FORMAT")
                        .help("Output format"),
                ),
            Command::new("interp")
                .about("Print the dynamic loader of an ELF executable")
                .arg(
                    Arg::new("executable")
                        .value_name("EXECUTABLE")
                        .help("Executable to inspect (defaults to the configured reference executable)"),
                ),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell to generate completions for"),
                ),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("micropack.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
