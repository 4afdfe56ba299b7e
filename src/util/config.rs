//! Configuration file support for cmakegen.
//!
//! Two configuration file locations are read:
//! - Global: `<user config dir>/cmakegen/config.toml` - User-wide defaults
//! - Project: `<component>/.yotta/cmakegen.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default namespace directory for dependency build trees (`<build>/ym/<dep>`).
pub const DEFAULT_DEPS_NAMESPACE: &str = "ym";

/// Default `cmake_minimum_required` version for generated files.
pub const DEFAULT_CMAKE_MINIMUM_VERSION: &str = "2.8.11";

/// Default directory (relative to the root component) holding installed dependencies.
pub const DEFAULT_MODULES_DIR: &str = "yotta_modules";

/// Tooling directories the surveyor never descends into.
pub const BUILTIN_IGNORED_SUBDIRS: &[&str] = &["build", "yotta_modules", "yotta_targets", "CMake"];

/// cmakegen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation settings
    pub generate: GenerateConfig,
}

/// Settings that shape the generated tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Directory name under the build root that holds dependency build trees
    pub deps_namespace: Option<String>,

    /// Version passed to `cmake_minimum_required` in generated files
    pub cmake_minimum_version: Option<String>,

    /// Directory holding installed dependencies, relative to the root component
    pub modules_dir: Option<PathBuf>,

    /// Extra top-level subdirectory names to skip, in addition to the builtin set
    #[serde(default)]
    pub ignore_subdirs: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.generate.deps_namespace.is_some() {
            self.generate.deps_namespace = other.generate.deps_namespace;
        }
        if other.generate.cmake_minimum_version.is_some() {
            self.generate.cmake_minimum_version = other.generate.cmake_minimum_version;
        }
        if other.generate.modules_dir.is_some() {
            self.generate.modules_dir = other.generate.modules_dir;
        }
        // Ignore lists accumulate
        for dir in other.generate.ignore_subdirs {
            if !self.generate.ignore_subdirs.contains(&dir) {
                self.generate.ignore_subdirs.push(dir);
            }
        }
    }

    pub fn deps_namespace(&self) -> &str {
        self.generate
            .deps_namespace
            .as_deref()
            .unwrap_or(DEFAULT_DEPS_NAMESPACE)
    }

    pub fn cmake_minimum_version(&self) -> &str {
        self.generate
            .cmake_minimum_version
            .as_deref()
            .unwrap_or(DEFAULT_CMAKE_MINIMUM_VERSION)
    }

    pub fn modules_dir(&self) -> &Path {
        self.generate
            .modules_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_MODULES_DIR))
    }

    /// Whether the surveyor should skip a top-level subdirectory by name.
    pub fn is_ignored_subdir(&self, name: &str) -> bool {
        BUILTIN_IGNORED_SUBDIRS.contains(&name)
            || self.generate.ignore_subdirs.iter().any(|d| d == name)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.yotta/cmakegen.toml)
/// 2. Global config (<user config dir>/cmakegen/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config path, if a user config directory exists.
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "yotta", "cmakegen")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Get the project config path for a component root.
pub fn project_config_path(component_root: &Path) -> PathBuf {
    component_root.join(".yotta").join("cmakegen.toml")
}
