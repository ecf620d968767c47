//! cxrun - Configure, build, and run a single C/C++ file
//!
//! This crate provides the library behind the `cxrun` binary: environment
//! probing, target name resolution, the CMake and direct-compile build
//! paths, and the orchestration that ties them together.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use core::{language::Language, target::TargetId};

pub use ops::error::RunError;
pub use ops::run::{run, BuildStrategy, RunRequest};
pub use util::config::RunConfig;
