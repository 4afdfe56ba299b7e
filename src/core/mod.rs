//! Core data structures for cmakegen.
//!
//! This module contains the inputs the generator consumes:
//! - Components and their ignore rules
//! - Build targets
//! - The catalog of installed components

pub mod catalog;
pub mod component;
pub mod ignore;
pub mod target;

pub use catalog::{ComponentCatalog, DependencyMap};
pub use component::Component;
pub use ignore::IgnoreList;
pub use target::Target;
