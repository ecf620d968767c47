//! Read-only queries: list generators, compute the binary path.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::builder::cmake::{binary_path, Generator};
use crate::builder::probe::{Probe, PREFERRED_GENERATORS};
use crate::core::target::{is_inside, resolve_target};
use crate::util::config::RunConfig;
use crate::util::fs::normalize_path;

/// All generators CMake reports, in reported order.
///
/// Empty when CMake is missing or its output can't be read.
pub fn list_generators(probe: &Probe) -> Vec<String> {
    probe.capabilities().generators().to_vec()
}

/// Where a project build of a file would put its binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryLocation {
    /// Path the binary would have.
    Path(PathBuf),
    /// The file is not under the project root, so there is no fixed path.
    OutsideProject,
    /// No generator could be chosen.
    NoGenerator,
}

impl fmt::Display for BinaryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryLocation::Path(path) => write!(f, "{}", path.display()),
            BinaryLocation::OutsideProject => write!(f, "(file outside project)"),
            BinaryLocation::NoGenerator => write!(f, "(no generator available)"),
        }
    }
}

/// Compute the binary path for `file` without configuring or building.
pub fn locate_binary(config: &RunConfig, probe: &Probe, file: &Path, project_root: &Path) -> BinaryLocation {
    let root = normalize_path(project_root, project_root);
    let file = normalize_path(file, &root);

    if !is_inside(&file, &root) {
        return BinaryLocation::OutsideProject;
    }

    let generator = match config.generator {
        Some(ref name) => Generator::new(name),
        None => match probe.select_generator(PREFERRED_GENERATORS) {
            Some(name) => Generator::new(name),
            None => return BinaryLocation::NoGenerator,
        },
    };

    let target = resolve_target(&file, &root);
    BinaryLocation::Path(binary_path(
        &root.join(&config.build_dir),
        &generator,
        &config.build_config,
        &target,
    ))
}
