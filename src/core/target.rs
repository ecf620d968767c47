//! Build target identifiers.
//!
//! The companion CMake project defines one executable target per source
//! file, named after the file's path relative to the project root:
//! separators become `_` and the lowercased extension is appended, so
//! `src/foo.c` is built by target `src_foo_c`.

use std::fmt;
use std::path::{Component, Path};

use crate::util::fs::{normalize_path, relative_to};

/// Joiner used in place of path separators and before the extension.
const JOINER: char = '_';

/// Name of a CMake target derived from a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetId(String);

impl TargetId {
    /// Get the target name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the placeholder produced for files outside the project.
    ///
    /// The placeholder contains `<`, `:` and `>`, none of which CMake accepts
    /// in a target name, so it can never name a real target.
    pub fn is_outside_project(&self) -> bool {
        self.0.starts_with('<')
    }

    fn outside_project(file: &Path) -> Self {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        TargetId(format!("<outside-project:{}>", name))
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the target name for `file` within `project_root`.
///
/// Relative paths are taken relative to `project_root`. Files outside the
/// root resolve to a placeholder that no build will find.
pub fn resolve_target(file: &Path, project_root: &Path) -> TargetId {
    let root = normalize_path(project_root, project_root);
    let file = normalize_path(file, &root);

    let Some(rel) = relative_to(&file, &root) else {
        return TargetId::outside_project(&file);
    };

    let stem = rel.with_extension("");
    let mut name = stem
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(&JOINER.to_string());

    if let Some(ext) = file.extension() {
        name.push(JOINER);
        name.push_str(&ext.to_string_lossy().to_lowercase());
    }

    TargetId(name)
}

/// Check whether `file` lies inside `project_root`.
pub fn is_inside(file: &Path, project_root: &Path) -> bool {
    let root = normalize_path(project_root, project_root);
    relative_to(&normalize_path(file, &root), &root).is_some()
}
