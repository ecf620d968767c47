//! Command implementations

pub mod completions;
pub mod generators;
pub mod print_binary;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::Cli;
use cxrun::util::config::{global_config_path, load_config, project_config_path, Overrides};
use cxrun::RunConfig;

/// Project root: the working directory the tool was started in.
pub fn project_root() -> Result<PathBuf> {
    std::env::current_dir().context("failed to determine current directory")
}

/// Resolve settings from config files, environment and flags.
pub fn resolve_config(cli: &Cli, root: &Path) -> RunConfig {
    let global = global_config_path();
    let file = load_config(global.as_deref(), &project_config_path(root));

    RunConfig::resolve(
        file,
        Overrides {
            generator: cli.generator.clone(),
            build_config: cli.build_config.clone(),
            cmake_args: cli.cmake_args.clone(),
            build_args: cli.build_args.clone(),
        },
    )
}
