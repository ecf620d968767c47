//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell as CompletionShell;

use cxrun::util::config::BUILD_CONFIG_ENV;
use cxrun::util::shell::ColorChoice;

/// cxrun - Build a single C or C++ file and run it
///
/// Inside a CMake project the file is built as the target named after its
/// path relative to the project root (`src/foo.c` builds `src_foo_c`).
/// Without CMake, or for files outside the project, it is compiled directly.
#[derive(Parser)]
#[command(name = "cxrun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source file to build and run, then arguments passed to the program
    ///
    /// Everything after FILE goes to the program, including options cxrun
    /// itself understands.
    #[arg(
        value_name = "FILE",
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present_any = ["list_generators", "completions"]
    )]
    pub command: Vec<String>,

    /// CMake generator to use instead of auto-selection
    #[arg(short = 'G', long, value_name = "NAME")]
    pub generator: Option<String>,

    /// Build configuration (Debug, Release, ...)
    #[arg(long = "config", value_name = "NAME", env = BUILD_CONFIG_ENV)]
    pub build_config: Option<String>,

    /// Extra argument for the CMake configure step (repeatable)
    #[arg(long = "cmake-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub cmake_args: Vec<String>,

    /// Extra argument for the CMake build step (repeatable)
    #[arg(long = "build-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub build_args: Vec<String>,

    /// List the generators CMake reports and exit
    #[arg(long, conflicts_with = "print_binary")]
    pub list_generators: bool,

    /// Print where the binary for FILE would be placed and exit
    #[arg(long)]
    pub print_binary: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completions: Option<CompletionShell>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,
}

impl Cli {
    /// The source file, if one was given.
    pub fn file(&self) -> Option<PathBuf> {
        self.command.first().map(PathBuf::from)
    }

    /// Arguments for the program: everything after FILE.
    pub fn program_args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }
}
