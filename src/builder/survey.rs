//! Classification of a component's top-level subdirectories.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::errors::GenerateWarning;
use crate::builder::sources::{contains_source_files, SourceFile};
use crate::core::Component;
use crate::util::config::Config;

/// File name of a build descriptor.
pub const CMAKELISTS: &str = "CMakeLists.txt";

pub const SOURCE_DIR: &str = "source";
pub const TEST_DIR: &str = "test";
pub const RESOURCE_DIR: &str = "resource";

/// Where each of a component's subdirectories fits in the generated build.
#[derive(Debug, Clone, Default)]
pub struct SubdirSurvey {
    /// Subdirectories with a hand-written `CMakeLists.txt`
    pub manual: Vec<String>,
    /// Subdirectories to generate a build file for, with their sources
    pub auto: Vec<(String, Vec<SourceFile>)>,
    /// Subdirectory -> executable name
    pub binaries: BTreeMap<String, String>,
    /// Subdirectories that build tests (manual or generated)
    pub tests: Vec<String>,
    /// Full paths of resource directories
    pub resources: Vec<PathBuf>,
}

impl SubdirSurvey {
    pub fn is_test(&self, dirname: &str) -> bool {
        self.tests.iter().any(|t| t == dirname)
    }

    /// Names of every subdirectory that has a build file at this level.
    pub fn build_dirs(&self) -> impl Iterator<Item = &str> {
        self.manual
            .iter()
            .map(String::as_str)
            .chain(self.auto.iter().map(|(name, _)| name.as_str()))
    }
}

/// Survey the immediate subdirectories of `component`.
///
/// Naming-convention problems are appended to `warnings`; they never change
/// how a directory is classified.
pub fn survey_subdirectories(
    component: &Component,
    config: &Config,
    warnings: &mut Vec<GenerateWarning>,
) -> Result<SubdirSurvey> {
    let root = component.path();
    let mut survey = SubdirSurvey {
        binaries: component.binaries().clone(),
        ..SubdirSurvey::default()
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(root)
        .with_context(|| format!("failed to read directory: {}", root.display()))?
    {
        let entry = entry?;
        // Follows symlinks: linked source trees count as directories.
        if !entry.path().is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    for name in names {
        if config.is_ignored_subdir(&name) || name.starts_with('.') || name.starts_with('_') {
            continue;
        }
        let dir = root.join(&name);

        if dir.join(CMAKELISTS).is_file() {
            check_standard_dir(&name, component, warnings);
            if name == TEST_DIR {
                survey.tests.push(name.clone());
            }
            survey.manual.push(name);
        } else if name == SOURCE_DIR || name == TEST_DIR || survey.binaries.contains_key(&name) {
            if let Some(sources) = contains_source_files(&dir, component) {
                if name == TEST_DIR {
                    survey.tests.push(name.clone());
                }
                survey.auto.push((name, sources));
            }
        } else if name == RESOURCE_DIR {
            survey.resources.push(dir);
        } else if matches!(
            name.to_lowercase().as_str(),
            "source" | "src" | "test" | "resource"
        ) {
            check_standard_dir(&name, component, warnings);
        }
    }

    Ok(survey)
}

/// Naming-convention check for a subdirectory.
///
/// Returns a message when the name looks like a conventional directory
/// spelled differently, or when it repeats the component name (which is
/// reserved for public headers).
pub fn standard_dir_error(dirname: &str, component_name: &str) -> Option<String> {
    let lower = dirname.to_lowercase();
    let expected = match lower.as_str() {
        "source" | "src" | "sources" => SOURCE_DIR,
        "test" | "tests" => TEST_DIR,
        "resource" | "resources" => RESOURCE_DIR,
        _ if dirname == component_name => {
            return Some(format!(
                "Module {} public include directory {} should not contain source files",
                component_name, dirname
            ))
        }
        _ => return None,
    };
    if dirname == expected {
        None
    } else {
        Some(format!(
            "Module {} has non-standard directory name: \"{}\" should be \"{}\"",
            component_name, dirname, expected
        ))
    }
}

fn check_standard_dir(dirname: &str, component: &Component, warnings: &mut Vec<GenerateWarning>) {
    if let Some(message) = standard_dir_error(dirname, component.name()) {
        tracing::warn!("{}", message);
        warnings.push(GenerateWarning::NonStandardDirectory {
            component: component.name().to_string(),
            dirname: dirname.to_string(),
            message,
        });
    }
}
