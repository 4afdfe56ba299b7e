//! Test utilities for cmakegen unit tests.
//!
//! Component trees are written to temporary directories on the real
//! filesystem, since the generator's behaviour is defined by what it finds
//! there.
//!
//! # Example
//!
//! ```rust,ignore
//! use cmakegen::test_support::ComponentFixture;
//!
//! let fx = ComponentFixture::library("app")
//!     .dependency("util")
//!     .installed(ComponentFixture::library("util"))
//!     .write();
//! let app = fx.component();
//! ```

pub mod fixtures;

pub use fixtures::*;
