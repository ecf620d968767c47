//! Source language detection and per-language defaults.

use std::fmt;
use std::path::Path;

/// Source language of the file being run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    /// C language
    C,
    /// C++ language (default for anything that isn't `.c`)
    #[default]
    Cxx,
}

/// C compilers tried in order when compiling directly.
pub const C_COMPILERS: &[&str] = &["cc", "gcc", "clang", "cl"];

/// C++ compilers tried in order when compiling directly.
pub const CXX_COMPILERS: &[&str] = &["c++", "g++", "clang++", "cl"];

impl Language {
    /// Detect the language from a file extension.
    ///
    /// Only `.c` (any case) is treated as C; every other extension,
    /// including none, is compiled as C++.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("c") => Language::C,
            _ => Language::Cxx,
        }
    }

    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
        }
    }

    /// Compiler names to probe for, in preference order.
    pub fn compiler_candidates(&self) -> &'static [&'static str] {
        match self {
            Language::C => C_COMPILERS,
            Language::Cxx => CXX_COMPILERS,
        }
    }

    /// Language standard used for direct compilation (e.g., "c17").
    pub fn std_flag_value(&self) -> &'static str {
        match self {
            Language::C => "c17",
            Language::Cxx => "c++20",
        }
    }

    /// Prefix for the temporary directory used by direct compilation.
    pub fn temp_dir_prefix(&self) -> &'static str {
        match self {
            Language::C => "c-run-",
            Language::Cxx => "cpp-run-",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::C => write!(f, "C"),
            Language::Cxx => write!(f, "C++"),
        }
    }
}
