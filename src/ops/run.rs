//! Implementation of a run: build the file one way or another, execute it,
//! and clean up.
//!
//! The sequence is strictly linear:
//! probe → pick strategy → project build or direct compile → locate binary
//! → execute → cleanup. Each external process finishes before the next
//! step starts.

use std::path::{Path, PathBuf};

use crate::builder::cmake::{is_cmake_project, CMakeBuilder, Generator};
use crate::builder::direct::{self, DirectBuild};
use crate::builder::probe::{Probe, PREFERRED_GENERATORS};
use crate::core::language::Language;
use crate::core::target::{is_inside, resolve_target, TargetId};
use crate::ops::error::RunError;
use crate::util::build_log::BuildLog;
use crate::util::config::RunConfig;
use crate::util::fs::normalize_path;
use crate::util::process::{exit_code_of, ProcessBuilder};
use crate::util::shell::{Shell, Status};

/// What to run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Source file, absolute or relative to `project_root`
    pub file: PathBuf,

    /// Arguments passed through to the program
    pub args: Vec<String>,

    /// Root of the CMake project (the working directory for the CLI)
    pub project_root: PathBuf,
}

/// Why the project build was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// CMake is not on the search path.
    NoBuildTool,
    /// The file is not under the project root.
    OutsideProject,
}

impl FallbackReason {
    fn message(&self) -> &'static str {
        match self {
            FallbackReason::NoBuildTool => {
                "CMake is not installed or not on PATH; falling back to direct compilation"
            }
            FallbackReason::OutsideProject => {
                "the provided file is outside this project; falling back to direct compilation"
            }
        }
    }
}

/// How the file gets built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStrategy {
    /// Configure and build the file's target in the surrounding CMake project.
    Project { cmake: PathBuf, target: TargetId },
    /// Compile the file on its own.
    Direct { reason: FallbackReason },
}

/// Choose between a project build and direct compilation.
pub fn select_strategy(cmake: Option<PathBuf>, file: &Path, project_root: &Path) -> BuildStrategy {
    let Some(cmake) = cmake else {
        return BuildStrategy::Direct {
            reason: FallbackReason::NoBuildTool,
        };
    };

    if !is_inside(file, project_root) {
        return BuildStrategy::Direct {
            reason: FallbackReason::OutsideProject,
        };
    }

    BuildStrategy::Project {
        cmake,
        target: resolve_target(file, project_root),
    }
}

/// The product of the build step.
enum Built {
    Project(PathBuf),
    Direct(DirectBuild),
}

impl Built {
    fn binary(&self) -> &Path {
        match self {
            Built::Project(path) => path,
            Built::Direct(build) => build.binary(),
        }
    }
}

/// Runs source files with a fixed configuration.
pub struct Runner<'a> {
    config: &'a RunConfig,
    probe: &'a Probe,
    shell: &'a Shell,
}

impl<'a> Runner<'a> {
    /// Create a runner.
    pub fn new(config: &'a RunConfig, probe: &'a Probe, shell: &'a Shell) -> Self {
        Runner {
            config,
            probe,
            shell,
        }
    }

    /// Build and run `request.file`.
    ///
    /// Returns once the temporary directory of a direct compile, if any,
    /// has been removed, whatever the outcome of the program.
    pub fn run(&self, request: &RunRequest) -> Result<(), RunError> {
        let root = normalize_path(&request.project_root, &request.project_root);
        let file = normalize_path(&request.file, &root);
        let log = BuildLog::create(root.join(&self.config.log_file))?;

        let strategy = select_strategy(self.probe.find_cmake(), &file, &root);
        tracing::debug!("strategy: {:?}", strategy);

        let built = match strategy {
            BuildStrategy::Project { cmake, target } => {
                Built::Project(self.build_project(cmake, &root, &target, &log)?)
            }
            BuildStrategy::Direct { reason } => {
                self.shell.warn(reason.message());
                Built::Direct(self.compile_direct(&file, &log)?)
            }
        };

        let result = self.execute(built.binary(), &request.args);

        if let Built::Direct(build) = built {
            build.cleanup();
        }

        result
    }

    /// Pick the generator: explicit override first, then the preference list.
    fn generator(&self) -> Result<Generator, RunError> {
        if let Some(ref name) = self.config.generator {
            return Ok(Generator::new(name));
        }

        self.probe
            .select_generator(PREFERRED_GENERATORS)
            .map(Generator::new)
            .ok_or_else(|| RunError::NoGenerator {
                tried: PREFERRED_GENERATORS.iter().map(|g| g.to_string()).collect(),
            })
    }

    fn build_project(
        &self,
        cmake: PathBuf,
        root: &Path,
        target: &TargetId,
        log: &BuildLog,
    ) -> Result<PathBuf, RunError> {
        let generator = self.generator()?;

        if !is_cmake_project(root) {
            self.shell
                .warn(format!("no CMakeLists.txt in {}", root.display()));
        }

        let builder = CMakeBuilder::new(cmake, root, generator)
            .build_dir(root.join(&self.config.build_dir))
            .build_config(&self.config.build_config)
            .configure_args(self.config.cmake_args.iter().cloned())
            .build_args(self.config.build_args.iter().cloned());

        let step = self.shell.step(
            Status::Configuring,
            format!("{} ({})", root.display(), builder.generator()),
        );
        builder.configure(log)?;
        step.finish("configure");

        let step = self.shell.step(
            Status::Building,
            format!("`{}` ({})", target, self.config.build_config),
        );
        builder.compile(target, log)?;
        step.finish(format!("`{}`", target));

        builder.locate_binary(target)
    }

    fn compile_direct(&self, file: &Path, log: &BuildLog) -> Result<DirectBuild, RunError> {
        let language = Language::from_path(file);
        let candidates = language.compiler_candidates();

        let compiler = self
            .probe
            .select_compiler(candidates)
            .ok_or_else(|| RunError::NoCompiler {
                language,
                tried: candidates.iter().map(|c| c.to_string()).collect(),
            })?;

        let step = self.shell.step(
            Status::Compiling,
            format!("{} ({})", file.display(), compiler.name()),
        );
        let build = direct::compile(&compiler, file, language, log)?;
        step.finish(format!("{} `{}`", language, compiler.name()));

        Ok(build)
    }

    /// Run the program with inherited stdio.
    fn execute(&self, binary: &Path, args: &[String]) -> Result<(), RunError> {
        self.shell.status(Status::Running, binary.display());
        if !args.is_empty() {
            self.shell.note(format!("arguments: {}", args.join(" ")));
        }

        let status = ProcessBuilder::new(binary).args(args).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(RunError::ProgramFailed {
                code: exit_code_of(status),
            })
        }
    }
}

/// Build and run a file.
pub fn run(
    config: &RunConfig,
    probe: &Probe,
    shell: &Shell,
    request: &RunRequest,
) -> Result<(), RunError> {
    Runner::new(config, probe, shell).run(request)
}
