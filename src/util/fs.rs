//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// What [`write_if_different`] did to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    /// The file did not exist
    Created,
    /// The file existed with different contents
    Updated,
    /// The file already had these contents and was not touched
    Unchanged,
}

impl WriteOutcome {
    /// Whether the file on disk was modified.
    pub fn is_modified(self) -> bool {
        !matches!(self, WriteOutcome::Unchanged)
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Write `contents` to `path` only if the file's current contents differ.
///
/// Parent directories are created as needed. An unchanged file keeps its
/// modification time, so downstream build tools see nothing to redo.
pub fn write_if_different(path: &Path, contents: &str) -> Result<WriteOutcome> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let outcome = match fs::read(path) {
        Ok(current) if current == contents.as_bytes() => return Ok(WriteOutcome::Unchanged),
        Ok(_) => WriteOutcome::Updated,
        Err(e) if e.kind() == io::ErrorKind::NotFound => WriteOutcome::Created,
        // Unreadable (e.g. not UTF-8 or a permissions quirk): try to replace it.
        Err(e) => {
            tracing::debug!("could not read {}: {}", path.display(), e);
            WriteOutcome::Updated
        }
    };

    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))?;
    Ok(outcome)
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Make `path` absolute against the current directory without touching the
/// filesystem. `.` components are dropped; symlinks and `..` are kept.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("failed to get current directory")?
            .join(path)
    };
    Ok(joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect())
}

/// Render a path for a CMake string literal: backslashes are escaped.
pub fn cmake_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\")
}
