//! Build descriptor values.
//!
//! Each generated `CMakeLists.txt` is first built as one of these plain
//! values and then rendered (see `render`). Keeping the two apart lets the
//! traversal be tested without string matching and the text format be tested
//! without a filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;
use walkdir::WalkDir;

use crate::builder::closure::IncludePaths;
use crate::builder::errors::GenerateError;
use crate::builder::sources::{SourceFile, SourceLanguage};
use crate::builder::survey::{SubdirSurvey, SOURCE_DIR, TEST_DIR};
use crate::core::target::sanitize_symbol;
use crate::core::Component;

/// Prefix of the per-directory dummy library directory name.
pub const DUMMY_LIB_DIR_PREFIX: &str = "yotta_dummy_lib_";

/// Prefix of the no-op symbol defined by a dummy library.
pub const DUMMY_SYMBOL_PREFIX: &str = "__yotta_dummy_lib_symbol_";

/// Translation unit name inside a dummy library directory.
pub const DUMMY_C_FILE: &str = "dummy.c";

/// What a source directory produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Library,
    Executable,
}

/// A library or executable built from one source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDirDescriptor {
    pub object_name: String,
    pub kind: ArtifactKind,
    /// The directory in the component, added to the include path
    pub source_directory: PathBuf,
    pub cmake_minimum_version: String,
    /// Files grouped by language
    pub files: BTreeMap<SourceLanguage, Vec<PathBuf>>,
    pub resource_files: Vec<PathBuf>,
    /// Library and component names to link, in order
    pub link_dependencies: Vec<String>,
}

impl SourceDirDescriptor {
    pub fn has_language(&self, lang: SourceLanguage) -> bool {
        self.files.contains_key(&lang)
    }

    /// Property-list files, bound as the bundle's Info.plist.
    pub fn plist_files(&self) -> &[PathBuf] {
        self.files
            .get(&SourceLanguage::Plist)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// One test executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestBinary {
    pub name: String,
    pub sources: Vec<PathBuf>,
    pub languages: BTreeSet<SourceLanguage>,
}

/// All test executables built from a test directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestDirDescriptor {
    pub source_directory: PathBuf,
    pub tests: Vec<TestBinary>,
    /// Linked by every test: immediate dependencies, then the component
    pub link_dependencies: Vec<String>,
}

/// A near-empty library that makes a component linkable when it builds
/// nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DummyLibDescriptor {
    pub lib_name: String,
    /// Directory name under the component's build directory
    pub dir_name: String,
    pub symbol: String,
    pub link_dependencies: Vec<String>,
}

impl DummyLibDescriptor {
    /// Contents of the dummy translation unit.
    pub fn c_source(&self) -> String {
        format!("void {}(){{}}\n", self.symbol)
    }
}

/// Toolchain bootstrap, emitted only at the root of the generated tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bootstrap {
    pub target_name: String,
    pub toolchain_file: PathBuf,
    pub cmake_minimum_version: String,
    /// Sanitized names of the target and its ancestors, for `TARGET_LIKE_*`
    pub targets_like: Vec<String>,
}

/// `add_subdirectory(source binary)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subdirectory {
    pub source: PathBuf,
    pub binary: PathBuf,
}

/// The top-level build file for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDescriptor {
    pub component_name: String,
    pub component_version: String,
    pub bootstrap: Option<Bootstrap>,
    pub includes: IncludePaths,
    /// Merged Objective-C flags; empty means none
    pub objc_flags: String,
    /// Preprocessor definitions, e.g. `-DTARGET=X`
    pub definitions: Vec<String>,
    /// Build directories of dependencies first reached through this component
    pub dependency_subdirs: Vec<PathBuf>,
    /// Manual, generated and dummy subdirectories of this component
    pub own_subdirs: Vec<Subdirectory>,
}

/// Describe a `source` or binary-producing directory.
///
/// Anything else is a surveyor/generator mismatch and is returned as
/// [`GenerateError::UnsupportedDirectory`].
pub fn source_dir_descriptor(
    component: &Component,
    dirname: &str,
    sources: &[SourceFile],
    survey: &SubdirSurvey,
    immediate_dependencies: &[String],
    cmake_minimum_version: &str,
) -> Result<SourceDirDescriptor, GenerateError> {
    let (object_name, kind) = match survey.binaries.get(dirname) {
        Some(exe) => (exe.clone(), ArtifactKind::Executable),
        None if dirname == SOURCE_DIR => (component.name().to_string(), ArtifactKind::Library),
        None => {
            return Err(GenerateError::UnsupportedDirectory {
                component: component.name().to_string(),
                dirname: dirname.to_string(),
            })
        }
    };

    // The main artifact links everything else built at this level.
    let mut link_dependencies = immediate_dependencies.to_vec();
    link_dependencies.extend(
        survey
            .build_dirs()
            .filter(|d| *d != SOURCE_DIR && *d != TEST_DIR && *d != dirname)
            .map(str::to_string),
    );

    let mut files: BTreeMap<SourceLanguage, Vec<PathBuf>> = BTreeMap::new();
    for f in sources {
        files.entry(f.lang).or_default().push(f.full_path.clone());
    }

    Ok(SourceDirDescriptor {
        object_name,
        kind,
        source_directory: component.path().join(dirname),
        cmake_minimum_version: cmake_minimum_version.to_string(),
        files,
        resource_files: resource_files(&survey.resources),
        link_dependencies,
    })
}

/// Every file below the resource directories, in path order.
fn resource_files(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = dirs
        .iter()
        .flat_map(|d| WalkDir::new(d).into_iter().filter_map(Result::ok))
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Describe a test directory: one binary per top-level file, one per
/// first-level subdirectory.
pub fn test_dir_descriptor(
    component: &Component,
    dirname: &str,
    sources: &[SourceFile],
    immediate_dependencies: &[String],
) -> TestDirDescriptor {
    let name = component.name();
    let mut top_level = Vec::new();
    let mut grouped: BTreeMap<String, Vec<&SourceFile>> = BTreeMap::new();

    for f in sources {
        let within = f.rel_path.strip_prefix(dirname).unwrap_or(&f.rel_path);
        let mut parts = within.components();
        let first = parts.next();
        match (first, parts.next()) {
            (Some(subdir), Some(_)) => grouped
                .entry(subdir.as_os_str().to_string_lossy().into_owned())
                .or_default()
                .push(f),
            _ => top_level.push(f),
        }
    }

    let mut tests: Vec<TestBinary> = top_level
        .into_iter()
        .map(|f| TestBinary {
            name: format!("{}-test-{}", name, f.stem().to_lowercase()),
            sources: vec![f.full_path.clone()],
            languages: BTreeSet::from([f.lang]),
        })
        .collect();

    tests.extend(grouped.into_iter().map(|(subdir, files)| TestBinary {
        name: format!("{}-test-{}", name, subdir.to_lowercase()),
        sources: files.iter().map(|f| f.full_path.clone()).collect(),
        languages: files.iter().map(|f| f.lang).collect(),
    }));

    let mut link_dependencies = immediate_dependencies.to_vec();
    link_dependencies.push(name.to_string());

    TestDirDescriptor {
        source_directory: component.path().join(dirname),
        tests,
        link_dependencies,
    }
}

/// Describe the dummy library for a component with nothing else to link.
pub fn dummy_lib_descriptor(
    component: &Component,
    immediate_dependencies: &[String],
) -> DummyLibDescriptor {
    let safe_name = sanitize_symbol(component.name());
    DummyLibDescriptor {
        lib_name: component.name().to_string(),
        dir_name: format!("{}{}", DUMMY_LIB_DIR_PREFIX, safe_name),
        symbol: format!("{}{}", DUMMY_SYMBOL_PREFIX, safe_name),
        link_dependencies: immediate_dependencies.to_vec(),
    }
}
