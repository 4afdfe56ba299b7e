//! CMake descriptor generation.
//!
//! This module classifies component sources, aggregates closure-wide
//! include paths and flags, builds descriptor values, renders them, and
//! drives recursive generation across a dependency tree.

pub mod closure;
pub mod cmakegen;
pub mod descriptor;
pub mod errors;
pub mod events;
pub mod render;
pub mod sources;
pub mod survey;

pub use cmakegen::{CMakeGen, GenerateReport, WrittenFile};
pub use errors::{GenerateError, GenerateWarning};
pub use events::GenerateEvent;
pub use sources::{SourceFile, SourceLanguage};
