//! Build targets (platform/toolchain configurations).
//!
//! A target names a toolchain file and the chain of more generic targets it
//! is "similar to". The chain drives both target-specific dependencies and
//! the `TARGET_LIKE_*` definitions emitted into generated build files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Name of the target description file.
pub const TARGET_FILE: &str = "target.json";

/// Marker in a resolution order meaning "any target"; never a concrete name.
pub const WILDCARD: &str = "*";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTarget {
    name: String,
    #[serde(default)]
    similar_to: Vec<String>,
    toolchain: String,
}

/// A resolved build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    name: String,
    toolchain_file: PathBuf,
    similar_to: Vec<String>,
}

impl Target {
    pub fn new(name: impl Into<String>, toolchain_file: impl Into<PathBuf>) -> Self {
        Target {
            name: name.into(),
            toolchain_file: toolchain_file.into(),
            similar_to: Vec::new(),
        }
    }

    /// Set the ancestor chain, most specific first.
    pub fn with_similar_to(mut self, similar_to: Vec<String>) -> Self {
        self.similar_to = similar_to;
        self
    }

    /// Load a target from its directory; the toolchain path is resolved
    /// against that directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(TARGET_FILE);
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let raw: RawTarget = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if raw.name.trim().is_empty() {
            bail!("target in {} has an empty name", path.display());
        }

        Ok(Target {
            name: raw.name,
            toolchain_file: dir.join(raw.toolchain),
            similar_to: raw.similar_to,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path to the CMake toolchain file.
    pub fn toolchain_file(&self) -> &Path {
        &self.toolchain_file
    }

    /// This target followed by every target it is similar to, most specific
    /// first. May contain [`WILDCARD`] entries.
    pub fn dependency_resolution_order(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.similar_to.iter().map(String::as_str))
            .collect()
    }

    /// The resolution order with wildcard entries removed.
    pub fn concrete_ancestry(&self) -> impl Iterator<Item = &str> {
        self.dependency_resolution_order()
            .into_iter()
            .filter(|t| !t.contains(WILDCARD))
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Upper-cased identifier form of a target name: every character outside
/// `[A-Za-z0-9]` becomes `_`.
pub fn sanitize_target_name(name: &str) -> String {
    sanitize_symbol(name).to_uppercase()
}

/// Identifier form of an arbitrary name: every character outside
/// `[A-Za-z0-9]` becomes `_`. Case is preserved.
pub fn sanitize_symbol(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
