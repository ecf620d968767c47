//! cxrun CLI - build a single C/C++ file and run it

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;
use cxrun::util::Shell;

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cxrun=debug")
    } else {
        EnvFilter::new("cxrun=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);

    match dispatch(cli, &shell) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Run the requested command and return the process exit code.
fn dispatch(cli: Cli, shell: &Shell) -> Result<i32> {
    if let Some(target) = cli.completions {
        commands::completions::execute(target)?;
        return Ok(0);
    }

    if cli.list_generators {
        return commands::generators::execute();
    }

    if cli.print_binary {
        return commands::print_binary::execute(cli);
    }

    commands::run::execute(cli, shell)
}
