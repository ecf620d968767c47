//! Build paths for a single source file.
//!
//! - `probe`: which generators and compilers are available
//! - `cmake`: configure and build one target of the surrounding CMake project
//! - `direct`: compile the file on its own into a temporary directory

pub mod cmake;
pub mod direct;
pub mod probe;

pub use cmake::{CMakeBuilder, Generator};
pub use direct::{Compiler, CompilerFlavor, DirectBuild};
pub use probe::{Capabilities, Probe, PREFERRED_GENERATORS};
