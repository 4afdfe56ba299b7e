//! cmakegen - CMake build file generation for yotta-style component trees
//!
//! This crate provides the library behind the `cmakegen` binary: loading
//! components and targets, and generating a tree of `CMakeLists.txt` files
//! for a component and everything it depends on.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for cmakegen unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It writes component fixtures to temporary directories.
#[cfg(test)]
pub mod test_support;

pub use builder::{CMakeGen, GenerateReport};
pub use core::{Component, ComponentCatalog, Target};
pub use util::config::Config;
