//! High-level operations.
//!
//! This module contains the implementation of what the `cxrun` binary does.

pub mod error;
pub mod inspect;
pub mod run;

pub use error::RunError;
pub use inspect::{list_generators, locate_binary, BinaryLocation};
pub use run::{run, select_strategy, BuildStrategy, FallbackReason, RunRequest, Runner};
