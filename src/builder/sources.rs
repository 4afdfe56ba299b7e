//! Source file discovery and classification.
//!
//! Walks a directory below a component and tags each file with the language
//! it contributes to the generated build, based only on its extension.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::core::Component;
use crate::util::fs::relative_path;

/// Language tag for a classified file.
///
/// The declaration order is the order per-language file lists are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    C,
    Cpp,
    Objc,
    Header,
    /// Property list, bound as the bundle's Info.plist
    Plist,
}

impl SourceLanguage {
    /// Classify by extension (case-insensitive). Unknown extensions are `None`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "c" => Some(SourceLanguage::C),
            "cpp" | "cc" | "cxx" => Some(SourceLanguage::Cpp),
            "m" | "mm" => Some(SourceLanguage::Objc),
            "h" => Some(SourceLanguage::Header),
            "plist" => Some(SourceLanguage::Plist),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::C => "c",
            SourceLanguage::Cpp => "cpp",
            SourceLanguage::Objc => "objc",
            SourceLanguage::Header => "header",
            SourceLanguage::Plist => "plist",
        }
    }

    /// Upper-case form used in `YOTTA_AUTO_<LANG>_FILES`.
    pub fn cmake_upper(&self) -> &'static str {
        match self {
            SourceLanguage::C => "C",
            SourceLanguage::Cpp => "CPP",
            SourceLanguage::Objc => "OBJC",
            SourceLanguage::Header => "HEADER",
            SourceLanguage::Plist => "PLIST",
        }
    }
}

impl std::fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified file belonging to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Absolute path
    pub full_path: PathBuf,
    /// Path relative to the owning component's root
    pub rel_path: PathBuf,
    pub lang: SourceLanguage,
}

impl SourceFile {
    /// File name without its extension.
    pub fn stem(&self) -> String {
        self.full_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Lazily classify every file below `dir`.
///
/// Files the component ignores and files with unrecognized extensions are
/// skipped. Entries are visited in file-name order so output is stable.
pub fn classify_sources<'a>(
    dir: &Path,
    component: &'a Component,
) -> impl Iterator<Item = SourceFile> + 'a {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable path while scanning sources: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(move |entry| {
            let full_path = entry.into_path();
            let rel_path = relative_path(component.path(), &full_path);
            if component.ignores(&rel_path) {
                tracing::debug!("ignoring {}", rel_path.display());
                return None;
            }
            let lang = full_path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(SourceLanguage::from_extension)?;
            Some(SourceFile {
                full_path,
                rel_path,
                lang,
            })
        })
}

/// Collect the sources below `dir`, returning `None` when there are none.
pub fn contains_source_files(dir: &Path, component: &Component) -> Option<Vec<SourceFile>> {
    let sources: Vec<_> = classify_sources(dir, component).collect();
    if sources.is_empty() {
        None
    } else {
        Some(sources)
    }
}
