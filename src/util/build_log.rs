//! Run log capturing the output of every external step.
//!
//! The log is truncated when a run starts, appended to by each configure,
//! build or compile step, and left on disk afterwards. It is only read back
//! when a step fails.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::fs::ensure_dir;

/// Default log file name, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "build_output.log";

/// Append-only text log for a single run.
#[derive(Debug, Clone)]
pub struct BuildLog {
    path: PathBuf,
}

impl BuildLog {
    /// Create (or truncate) the log file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_dir(parent)?;
            }
        }
        File::create(&path)
            .with_context(|| format!("failed to create log file: {}", path.display()))?;
        Ok(BuildLog { path })
    }

    /// Refer to an existing log without truncating it.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        BuildLog { path: path.into() }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the log for appending.
    pub fn open_append(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open log file: {}", self.path.display()))
    }

    /// Append a single line.
    pub fn append_line(&self, line: &str) -> Result<()> {
        let mut file = self.open_append()?;
        writeln!(file, "{}", line)
            .with_context(|| format!("failed to write log file: {}", self.path.display()))
    }

    /// Read the whole log back.
    pub fn read(&self) -> Result<String> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("failed to read log file: {}", self.path.display()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Render the log between start and end markers for display on failure.
    pub fn render(&self) -> String {
        let body = if !self.path.exists() {
            "(log file not found)\n".to_string()
        } else {
            match self.read() {
                Ok(contents) if contents.ends_with('\n') || contents.is_empty() => contents,
                Ok(contents) => format!("{}\n", contents),
                Err(_) => "(failed to read log)\n".to_string(),
            }
        };

        format!(
            "---- build log ({}) ----\n{}---- end log ----\n",
            self.path.display(),
            body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_truncates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("build_output.log");
        fs::write(&path, "stale output from a previous run\n").unwrap();

        let log = BuildLog::create(&path).unwrap();
        assert_eq!(log.read().unwrap(), "");
    }

    #[test]
    fn test_append_accumulates() {
        let tmp = TempDir::new().unwrap();
        let log = BuildLog::create(tmp.path().join("logs").join("run.log")).unwrap();

        log.append_line("Configuring with generator: Ninja").unwrap();
        log.append_line("Building target: src_foo_c").unwrap();

        let contents = log.read().unwrap();
        assert_eq!(
            contents,
            "Configuring with generator: Ninja\nBuilding target: src_foo_c\n"
        );
    }

    #[test]
    fn test_render_has_markers() {
        let tmp = TempDir::new().unwrap();
        let log = BuildLog::create(tmp.path().join("build_output.log")).unwrap();
        log.append_line("error: boom").unwrap();

        let rendered = log.render();
        assert!(rendered.starts_with("---- build log ("));
        assert!(rendered.contains("error: boom\n"));
        assert!(rendered.ends_with("---- end log ----\n"));
        assert_eq!(rendered.matches("error: boom").count(), 1);
    }

    #[test]
    fn test_render_missing_file() {
        let tmp = TempDir::new().unwrap();
        let log = BuildLog::create(tmp.path().join("build_output.log")).unwrap();
        fs::remove_file(log.path()).unwrap();

        assert!(log.render().contains("(log file not found)"));
    }
}
