//! Failure taxonomy for a run and how each failure maps to an exit code.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::language::Language;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Exit code for failures that are not a child process's own exit code.
pub const INTERNAL_EXIT_CODE: i32 = 1;

/// Why a run stopped.
#[derive(Debug, Error)]
pub enum RunError {
    /// No preferred generator is available.
    #[error("no suitable CMake generator found")]
    NoGenerator { tried: Vec<String> },

    /// No compiler for the language is on PATH.
    #[error("no {language} compiler found")]
    NoCompiler { language: Language, tried: Vec<String> },

    /// `cmake -S .. -B ..` exited non-zero.
    #[error("CMake configure failed with exit code {code}")]
    ConfigureFailed { code: i32, log: PathBuf },

    /// `cmake --build .. --target ..` exited non-zero.
    #[error("CMake build of target `{target}` failed with exit code {code}")]
    BuildFailed {
        target: String,
        code: i32,
        log: PathBuf,
    },

    /// The direct compiler exited non-zero.
    #[error("compilation with `{compiler}` failed with exit code {code}")]
    CompileFailed {
        compiler: String,
        code: i32,
        log: PathBuf,
    },

    /// The build reported success but the binary isn't where it should be.
    #[error("built binary not found at {}", path.display())]
    BinaryNotFound { path: PathBuf },

    /// The program itself exited non-zero.
    #[error("executable returned non-zero exit code {code}")]
    ProgramFailed { code: i32 },

    /// I/O and process plumbing failures.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RunError {
    /// Process exit code for this failure.
    ///
    /// Child failures mirror the child's code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        let code = match self {
            RunError::ConfigureFailed { code, .. }
            | RunError::BuildFailed { code, .. }
            | RunError::CompileFailed { code, .. }
            | RunError::ProgramFailed { code } => *code,
            RunError::NoGenerator { .. }
            | RunError::NoCompiler { .. }
            | RunError::BinaryNotFound { .. }
            | RunError::Internal(_) => INTERNAL_EXIT_CODE,
        };

        // A zero here would report success for a failed run.
        if code == 0 {
            INTERNAL_EXIT_CODE
        } else {
            code
        }
    }

    /// The run log to show for this failure, if any.
    ///
    /// Only configure, build and compile failures have a log worth
    /// showing; a failing program is the user's program misbehaving.
    pub fn log_path(&self) -> Option<&Path> {
        match self {
            RunError::ConfigureFailed { log, .. }
            | RunError::BuildFailed { log, .. }
            | RunError::CompileFailed { log, .. } => Some(log),
            _ => None,
        }
    }

    /// Whether the run log should be shown for this failure.
    pub fn shows_log(&self) -> bool {
        self.log_path().is_some()
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RunError::NoGenerator { tried } => Diagnostic::error(self.to_string())
                .with_context(format!("tried: {}", tried.join(", ")))
                .with_suggestion(suggestions::INSTALL_GENERATOR)
                .with_suggestion(suggestions::LIST_GENERATORS),

            RunError::NoCompiler { tried, .. } => Diagnostic::error(self.to_string())
                .with_context(format!("looked for: {}", tried.join(", ")))
                .with_suggestion(suggestions::INSTALL_COMPILER),

            RunError::ConfigureFailed { log, .. } | RunError::CompileFailed { log, .. } => {
                Diagnostic::error(self.to_string())
                    .with_context(format!("logs at {}", log.display()))
            }

            RunError::BuildFailed { target, log, .. } => Diagnostic::error(self.to_string())
                .with_context(format!("logs at {}", log.display()))
                .with_suggestion(format!(
                    "{} (expected a target named `{}`)",
                    suggestions::CHECK_TARGET,
                    target
                )),

            RunError::BinaryNotFound { .. } | RunError::ProgramFailed { .. } => {
                Diagnostic::error(self.to_string())
            }

            RunError::Internal(e) => Diagnostic::error(format!("{:#}", e)),
        }
    }
}
