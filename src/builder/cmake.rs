//! CMake adapter: configure the project, build one target, find its binary.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::target::TargetId;
use crate::ops::error::RunError;
use crate::util::build_log::BuildLog;
use crate::util::process::{exit_code_of, ProcessBuilder};

/// A CMake generator name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator(String);

impl Generator {
    /// Wrap a generator name.
    pub fn new(name: impl Into<String>) -> Self {
        Generator(name.into())
    }

    /// The generator name as passed to `-G`.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether the generator holds several configurations at once.
    ///
    /// Multi-config generators pick the configuration at build time
    /// (`--config`) and place binaries in a per-configuration directory.
    pub fn is_multi_config(&self) -> bool {
        let name = self.0.to_lowercase();
        name.contains("multi-config") || name.contains("visual studio")
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of the executable CMake produces for `target`.
///
/// `<build_dir>[/<config>]/<target><exe suffix>`, with the configuration
/// directory only for multi-config generators.
pub fn binary_path(build_dir: &Path, generator: &Generator, config: &str, target: &TargetId) -> PathBuf {
    let mut dir = build_dir.to_path_buf();
    if generator.is_multi_config() {
        dir.push(config);
    }
    dir.join(format!("{}{}", target, std::env::consts::EXE_SUFFIX))
}

/// CMake build adapter.
#[derive(Debug, Clone)]
pub struct CMakeBuilder {
    cmake: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    generator: Generator,
    build_config: String,
    configure_args: Vec<String>,
    build_args: Vec<String>,
}

impl CMakeBuilder {
    /// Create a builder for the project in `source_dir`.
    ///
    /// The binary directory defaults to `<source_dir>/build`.
    pub fn new(cmake: impl Into<PathBuf>, source_dir: impl Into<PathBuf>, generator: Generator) -> Self {
        let source_dir = source_dir.into();
        let build_dir = source_dir.join("build");

        CMakeBuilder {
            cmake: cmake.into(),
            source_dir,
            build_dir,
            generator,
            build_config: "Debug".to_string(),
            configure_args: Vec::new(),
            build_args: Vec::new(),
        }
    }

    /// Set the build directory.
    pub fn build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_dir = dir.into();
        self
    }

    /// Set the build configuration (e.g., Debug, Release).
    pub fn build_config(mut self, config: impl Into<String>) -> Self {
        self.build_config = config.into();
        self
    }

    /// Add extra configure arguments.
    pub fn configure_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.configure_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add extra build arguments.
    pub fn build_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.build_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The generator in use.
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Command for the configure step.
    ///
    /// Safe to run on an already configured tree.
    pub fn configure_command(&self) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.cmake)
            .cwd(&self.source_dir)
            .arg("-S")
            .arg(&self.source_dir)
            .arg("-B")
            .arg(&self.build_dir)
            .arg("-G")
            .arg(self.generator.name())
            .arg("-Wno-dev");

        // Single-config generators fix the configuration here
        if !self.generator.is_multi_config() {
            cmd = cmd.arg(format!("-DCMAKE_BUILD_TYPE={}", self.build_config));
        }

        cmd.args(&self.configure_args)
    }

    /// Command for building `target`.
    pub fn build_command(&self, target: &TargetId) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.cmake)
            .cwd(&self.source_dir)
            .arg("--build")
            .arg(&self.build_dir)
            .arg("--target")
            .arg(target.as_str());

        // Multi-config generators pick the configuration here
        if self.generator.is_multi_config() {
            cmd = cmd.arg("--config").arg(&self.build_config);
        }

        cmd.args(&self.build_args)
    }

    /// Run the configure step.
    pub fn configure(&self, log: &BuildLog) -> Result<(), RunError> {
        tracing::debug!("configuring {} with {}", self.source_dir.display(), self.generator);
        log.append_line(&format!("Configuring with generator: {}", self.generator))?;

        let status = self.configure_command().exec_logged(log)?;
        if !status.success() {
            return Err(RunError::ConfigureFailed {
                code: exit_code_of(status),
                log: log.path().to_path_buf(),
            });
        }
        Ok(())
    }

    /// Run the build step for `target`.
    pub fn compile(&self, target: &TargetId, log: &BuildLog) -> Result<(), RunError> {
        tracing::debug!("building target {}", target);
        log.append_line(&format!("Building target: {}", target))?;

        let status = self.build_command(target).exec_logged(log)?;
        if !status.success() {
            return Err(RunError::BuildFailed {
                target: target.to_string(),
                code: exit_code_of(status),
                log: log.path().to_path_buf(),
            });
        }
        Ok(())
    }

    /// Where the binary for `target` ends up.
    pub fn binary_path(&self, target: &TargetId) -> PathBuf {
        binary_path(&self.build_dir, &self.generator, &self.build_config, target)
    }

    /// Locate the binary of a target that just built.
    pub fn locate_binary(&self, target: &TargetId) -> Result<PathBuf, RunError> {
        let path = self.binary_path(target);
        if path.is_file() {
            Ok(path)
        } else {
            Err(RunError::BinaryNotFound { path })
        }
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}
