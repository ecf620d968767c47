//! Shared utilities

pub mod build_log;
pub mod config;
pub mod diagnostic;
pub mod fs;
pub mod process;
pub mod shell;

pub use build_log::BuildLog;
pub use config::{Config, RunConfig};
pub use diagnostic::Diagnostic;
pub use shell::Shell;
