//! Direct single-file compilation without a build system.
//!
//! The binary is written into a fresh temporary directory that is removed
//! when the returned [`DirectBuild`] is dropped.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::TempDir;

use crate::core::language::Language;
use crate::ops::error::RunError;
use crate::util::build_log::BuildLog;
use crate::util::process::{exit_code_of, ProcessBuilder};

/// Command-line dialect of a compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerFlavor {
    /// gcc, clang and anything else taking GCC-style flags
    Gcc,
    /// Microsoft `cl`
    Msvc,
}

/// A compiler found on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    name: String,
    path: PathBuf,
    flavor: CompilerFlavor,
}

impl Compiler {
    /// Create a compiler from the name it was probed as and its resolved path.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let flavor = if name.eq_ignore_ascii_case("cl") {
            CompilerFlavor::Msvc
        } else {
            CompilerFlavor::Gcc
        };
        Compiler {
            name,
            path: path.into(),
            flavor,
        }
    }

    /// Name the compiler was probed as (e.g., "gcc").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved path of the compiler.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flag dialect of the compiler.
    pub fn flavor(&self) -> CompilerFlavor {
        self.flavor
    }

    /// Arguments compiling `source` into `output` with a fixed standard and
    /// no optimization.
    pub fn compile_args(&self, source: &Path, output: &Path, language: Language) -> Vec<String> {
        let source = source.display().to_string();
        let std = language.std_flag_value();

        match self.flavor {
            CompilerFlavor::Msvc => {
                let lang_flag = match language {
                    Language::C => "/TC",
                    Language::Cxx => "/TP",
                };
                vec![
                    source,
                    lang_flag.to_string(),
                    format!("/std:{}", std),
                    format!("/Fe{}", output.display()),
                    "/nologo".to_string(),
                ]
            }
            CompilerFlavor::Gcc => vec![
                source,
                format!("-std={}", std),
                "-O0".to_string(),
                "-g".to_string(),
                "-o".to_string(),
                output.display().to_string(),
            ],
        }
    }
}

/// File name of the compiled binary inside the temporary directory.
pub fn output_file_name() -> &'static str {
    if cfg!(windows) {
        "a.exe"
    } else {
        "a.out"
    }
}

/// A binary produced by direct compilation, owning its temporary directory.
#[derive(Debug)]
pub struct DirectBuild {
    dir: TempDir,
    binary: PathBuf,
}

impl DirectBuild {
    /// Path of the compiled binary.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Temporary directory holding the binary.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the temporary directory, ignoring any error.
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::debug!("failed to remove {}: {}", path.display(), e);
        }
    }
}

/// Compile `source` into a fresh temporary directory.
///
/// Compiler output goes to `log`. On failure the temporary directory is
/// removed before returning.
pub fn compile(
    compiler: &Compiler,
    source: &Path,
    language: Language,
    log: &BuildLog,
) -> Result<DirectBuild, RunError> {
    let dir = tempfile::Builder::new()
        .prefix(language.temp_dir_prefix())
        .tempdir()
        .context("failed to create temporary build directory")?;
    let binary = dir.path().join(output_file_name());

    log.append_line(&format!("Compiling with {}", compiler.name()))?;

    let status = ProcessBuilder::new(compiler.path())
        .args(compiler.compile_args(source, &binary, language))
        .exec_logged(log)?;

    if !status.success() {
        return Err(RunError::CompileFailed {
            compiler: compiler.name().to_string(),
            code: exit_code_of(status),
            log: log.path().to_path_buf(),
        });
    }

    Ok(DirectBuild { dir, binary })
}
