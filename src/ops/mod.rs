//! High-level operations.
//!
//! This module contains the implementation of cmakegen commands.

pub mod cmakegen_flags;
pub mod cmakegen_generate;

pub use cmakegen_flags::{flags, FlagsOptions, FlagsReport};
pub use cmakegen_generate::{generate, load_tree, ComponentTree, GenerateOptions, GenerateOutput};
