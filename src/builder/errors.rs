//! Generation error and warning types.
//!
//! Errors and warnings found while generating are collected rather than
//! returned, so one bad component does not stop the rest of the tree from
//! being written. Only [`GenerateError::UnsupportedDirectory`] aborts a run.

use miette::Diagnostic as MietteDiagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// A problem that makes the generated tree unusable as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GenerateError {
    #[error("no valid build target to generate `{component}` for")]
    #[diagnostic(code(cmakegen::generate::unresolved_target))]
    UnresolvedTarget { component: String },

    #[error("required dependency `{dependency}` of `{component}` is not installed")]
    #[diagnostic(
        code(cmakegen::generate::missing_dependency),
        help("install the dependency, then generate again")
    )]
    MissingDependency {
        component: String,
        dependency: String,
    },

    /// Surveyor and generator disagree about a directory's role. Fatal.
    #[error("cannot generate a build file for `{dirname}` of `{component}`: only source and test directories are supported")]
    #[diagnostic(code(cmakegen::generate::unsupported_directory))]
    UnsupportedDirectory { component: String, dirname: String },
}

impl GenerateError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            GenerateError::UnresolvedTarget { component } => Diagnostic::error(self.to_string())
                .with_context(format!("build files for `{}` were not written", component))
                .with_suggestion(suggestions::TARGET_NOT_SET),

            GenerateError::MissingDependency { dependency, .. } => {
                Diagnostic::error(self.to_string())
                    .with_context("the rest of the tree was still generated")
                    .with_suggestion(format!(
                        "Install `{}` into the modules directory",
                        dependency
                    ))
                    .with_suggestion(suggestions::MISSING_DEPENDENCY)
            }

            GenerateError::UnsupportedDirectory { .. } => Diagnostic::error(self.to_string())
                .with_suggestion(suggestions::REPORT_BUG),
        }
    }
}

/// A problem worth reporting that does not affect what was generated.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GenerateWarning {
    #[error("{message}")]
    #[diagnostic(code(cmakegen::survey::non_standard_directory))]
    NonStandardDirectory {
        component: String,
        dirname: String,
        message: String,
    },

    #[error("component {component} Objective-C flag \"{flag}\" clobbers a value earlier set by component {previous}")]
    #[diagnostic(code(cmakegen::flags::collision))]
    FlagCollision {
        /// Canonical flag name both components set
        flag_name: String,
        /// The full flag as written by `component`
        flag: String,
        component: String,
        previous: String,
    },
}

impl GenerateWarning {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            GenerateWarning::NonStandardDirectory { dirname, .. } => {
                Diagnostic::warning(self.to_string())
                    .with_context(format!("`{}` is not treated as a build directory", dirname))
            }
            GenerateWarning::FlagCollision { flag_name, .. } => {
                Diagnostic::warning(self.to_string()).with_context(format!(
                    "both flags are kept; the later `{}` takes effect",
                    flag_name
                ))
            }
        }
    }
}
