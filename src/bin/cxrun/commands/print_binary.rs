//! `cxrun --print-binary` command

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::commands::{project_root, resolve_config};
use cxrun::builder::Probe;
use cxrun::ops::locate_binary;

pub fn execute(cli: Cli) -> Result<i32> {
    let root = project_root()?;
    let config = resolve_config(&cli, &root);
    let file = cli.file().context("a source file is required")?;

    let location = locate_binary(&config, &Probe::from_env(), &file, &root);
    println!("{}", location);

    Ok(0)
}
