//! Core data types for cxrun.
//!
//! This module contains the small set of values the rest of the crate
//! passes around:
//! - The source language of the file being run
//! - Build target identifiers derived from source paths

pub mod language;
pub mod target;

pub use language::Language;
pub use target::{is_inside, resolve_target, TargetId};
