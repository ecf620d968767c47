//! Default command: build FILE and run it

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::commands::{project_root, resolve_config};
use cxrun::builder::Probe;
use cxrun::ops::{run, RunError, RunRequest};
use cxrun::util::{BuildLog, Shell};

pub fn execute(cli: Cli, shell: &Shell) -> Result<i32> {
    let root = project_root()?;
    let config = resolve_config(&cli, &root);
    let file = cli.file().context("a source file is required")?;

    let request = RunRequest {
        file,
        args: cli.program_args().to_vec(),
        project_root: root,
    };

    match run(&config, &Probe::from_env(), shell, &request) {
        Ok(()) => Ok(0),
        Err(RunError::Internal(e)) => Err(e),
        Err(e) => {
            shell.raw(e.to_diagnostic().format(shell.use_color()));
            if let Some(log) = e.log_path() {
                shell.raw(BuildLog::at(log).render());
            }
            Ok(e.exit_code())
        }
    }
}
