//! `cxrun --list-generators` command

use anyhow::Result;

use cxrun::builder::Probe;
use cxrun::ops::list_generators;

pub fn execute() -> Result<i32> {
    let generators = list_generators(&Probe::from_env());

    if generators.is_empty() {
        println!("No generators found. Ensure CMake is installed and on PATH.");
        return Ok(0);
    }

    println!("Available CMake generators:");
    for name in generators {
        println!("- {}", name);
    }

    Ok(0)
}
