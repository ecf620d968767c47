//! Environment probing: which generators CMake offers and which
//! compilers are on the search path.
//!
//! Probe failures never raise. A missing `cmake`, a non-zero exit or
//! unparseable output all read as "nothing available"; callers decide
//! whether that is fatal.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::builder::direct::Compiler;
use crate::util::process::ProcessBuilder;

/// Generators tried in order when none is given explicitly.
pub const PREFERRED_GENERATORS: &[&str] = &[
    "Ninja Multi-Config",
    "Ninja",
    "Unix Makefiles",
    "MinGW Makefiles",
    "Visual Studio 17 2022",
];

/// Generators reported by `cmake -E capabilities`, in reported order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    generators: Vec<String>,
}

#[derive(Deserialize)]
struct RawCapabilities {
    #[serde(default)]
    generators: Vec<RawGenerator>,
}

#[derive(Deserialize)]
struct RawGenerator {
    name: Option<String>,
}

impl Capabilities {
    /// Create a manifest from a list of generator names.
    pub fn new(generators: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Capabilities {
            generators: generators.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the JSON printed by `cmake -E capabilities`.
    ///
    /// Returns `None` when the output is not the expected JSON object.
    /// Generator entries without a name are skipped.
    pub fn parse(json: &str) -> Option<Self> {
        let raw: RawCapabilities = serde_json::from_str(json).ok()?;
        Some(Capabilities {
            generators: raw.generators.into_iter().filter_map(|g| g.name).collect(),
        })
    }

    /// Ask `cmake` for its capabilities.
    pub fn query(cmake: &Path) -> Self {
        let output = match ProcessBuilder::new(cmake)
            .args(["-E", "capabilities"])
            .exec()
        {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!("capability query failed: {:#}", e);
                return Capabilities::default();
            }
        };

        if !output.status.success() {
            tracing::debug!("`cmake -E capabilities` exited with {}", output.status);
            return Capabilities::default();
        }

        Capabilities::parse(&String::from_utf8_lossy(&output.stdout)).unwrap_or_else(|| {
            tracing::debug!("`cmake -E capabilities` printed invalid JSON");
            Capabilities::default()
        })
    }

    /// Reported generator names.
    pub fn generators(&self) -> &[String] {
        &self.generators
    }

    /// Whether no generators are known.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Whether `name` was reported.
    pub fn contains(&self, name: &str) -> bool {
        self.generators.iter().any(|g| g == name)
    }

    /// First entry of `preferred` that was reported.
    pub fn first_preferred(&self, preferred: &[&str]) -> Option<String> {
        preferred
            .iter()
            .copied()
            .find(|candidate| self.contains(candidate))
            .map(str::to_string)
    }
}

/// Looks up tools on an executable search path.
#[derive(Debug, Clone)]
pub struct Probe {
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl Probe {
    /// Probe the process `PATH`.
    pub fn from_env() -> Self {
        Probe {
            search_path: std::env::var_os("PATH"),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Probe an explicit search path (same syntax as `PATH`).
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Probe {
            search_path: Some(search_path.into()),
            ..Probe::from_env()
        }
    }

    /// Find an executable by name.
    pub fn find_executable(&self, name: &str) -> Option<PathBuf> {
        which::which_in(name, self.search_path.as_ref(), &self.cwd).ok()
    }

    /// Find CMake.
    pub fn find_cmake(&self) -> Option<PathBuf> {
        self.find_executable("cmake")
    }

    /// Query the capability manifest of the CMake on the search path.
    ///
    /// Empty when CMake is absent or the query fails.
    pub fn capabilities(&self) -> Capabilities {
        match self.find_cmake() {
            Some(cmake) => Capabilities::query(&cmake),
            None => {
                tracing::debug!("cmake not found on search path");
                Capabilities::default()
            }
        }
    }

    /// Pick the first generator from `preferred` that CMake reports.
    pub fn select_generator(&self, preferred: &[&str]) -> Option<String> {
        let selected = self.capabilities().first_preferred(preferred);
        tracing::debug!("selected generator: {:?}", selected);
        selected
    }

    /// Pick the first compiler from `preferred` found on the search path.
    pub fn select_compiler(&self, preferred: &[&str]) -> Option<Compiler> {
        preferred.iter().find_map(|name| {
            let path = self.find_executable(name)?;
            tracing::debug!("found compiler `{}` at {}", name, path.display());
            Some(Compiler::new(*name, path))
        })
    }
}

impl Default for Probe {
    fn default() -> Self {
        Probe::from_env()
    }
}
