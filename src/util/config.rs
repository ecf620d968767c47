//! Configuration for cxrun.
//!
//! Settings come from, lowest precedence first:
//! - Built-in defaults (`Debug`, `build/`, `build_output.log`)
//! - Global: `config.toml` in the platform config directory
//! - Project: `.cxrun/config.toml` under the project root
//! - The `CMAKE_BUILD_CONFIG` environment variable
//! - Command-line flags
//!
//! Everything is folded into a [`RunConfig`] once at startup and passed
//! explicitly to the orchestrator.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::util::build_log::DEFAULT_LOG_FILE;

/// Build configuration used when nothing else picks one.
pub const DEFAULT_BUILD_CONFIG: &str = "Debug";

/// CMake binary directory, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Environment variable naming the default build configuration.
pub const BUILD_CONFIG_ENV: &str = "CMAKE_BUILD_CONFIG";

/// Error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk configuration file contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run settings
    pub run: RunSection,
}

/// `[run]` section of a configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// CMake generator to use instead of auto-selection
    pub generator: Option<String>,

    /// Build configuration name (e.g., Debug, Release)
    pub config: Option<String>,

    /// Extra arguments for the configure step
    pub cmake_args: Vec<String>,

    /// Extra arguments for the build step
    pub build_args: Vec<String>,

    /// CMake binary directory, relative to the project root
    pub build_dir: Option<PathBuf>,

    /// Log file path, relative to the working directory
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration with fallback to defaults if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("{:#}", anyhow::Error::from(e));
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let other = other.run;
        if other.generator.is_some() {
            self.run.generator = other.generator;
        }
        if other.config.is_some() {
            self.run.config = other.config;
        }
        if !other.cmake_args.is_empty() {
            self.run.cmake_args = other.cmake_args;
        }
        if !other.build_args.is_empty() {
            self.run.build_args = other.build_args;
        }
        if other.build_dir.is_some() {
            self.run.build_dir = other.build_dir;
        }
        if other.log_file.is_some() {
            self.run.log_file = other.log_file;
        }
    }
}

/// Get the global config path (`<config dir>/cxrun/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "cxrun", "cxrun")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Get the project config path (`.cxrun/config.toml`).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".cxrun").join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.cxrun/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Settings given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--generator`
    pub generator: Option<String>,
    /// `--config`, or `CMAKE_BUILD_CONFIG` when the flag is absent
    pub build_config: Option<String>,
    /// `--cmake-arg`, in order
    pub cmake_args: Vec<String>,
    /// `--build-arg`, in order
    pub build_args: Vec<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Generator override; `None` means auto-select
    pub generator: Option<String>,
    /// Build configuration name
    pub build_config: String,
    /// Extra configure arguments
    pub cmake_args: Vec<String>,
    /// Extra build arguments
    pub build_args: Vec<String>,
    /// CMake binary directory, relative to the project root
    pub build_dir: PathBuf,
    /// Log file path
    pub log_file: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            generator: None,
            build_config: DEFAULT_BUILD_CONFIG.to_string(),
            cmake_args: Vec::new(),
            build_args: Vec::new(),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl RunConfig {
    /// Fold file configuration and overrides into the settings for a run.
    ///
    /// Scalar overrides replace file values; extra arguments from files come
    /// first, followed by those given on the command line.
    pub fn resolve(file: Config, overrides: Overrides) -> Self {
        let defaults = RunConfig::default();
        let run = file.run;

        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

        let mut cmake_args = run.cmake_args;
        cmake_args.extend(overrides.cmake_args);
        let mut build_args = run.build_args;
        build_args.extend(overrides.build_args);

        RunConfig {
            generator: non_empty(overrides.generator).or(non_empty(run.generator)),
            build_config: non_empty(overrides.build_config)
                .or(non_empty(run.config))
                .unwrap_or(defaults.build_config),
            cmake_args,
            build_args,
            build_dir: run.build_dir.unwrap_or(defaults.build_dir),
            log_file: run.log_file.unwrap_or(defaults.log_file),
        }
    }
}
