//! Component - an installed, resolved unit of source code.
//!
//! Components are described by a `module.json` file at their root. The
//! generator only reads them; resolution and installation happen elsewhere.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use semver::Version;
use serde::Deserialize;

use crate::core::ignore::IgnoreList;

/// Name of the component description file.
pub const MODULE_FILE: &str = "module.json";

/// Name of the per-component ignore file.
pub const IGNORE_FILE: &str = ".yotta_ignore";

/// The `bin` field: either a single subdirectory (executable named after the
/// component) or an explicit subdirectory -> executable name map.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BinSpec {
    Dir(String),
    Map(BTreeMap<String, String>),
}

/// Raw `module.json` as deserialized.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModule {
    name: String,
    version: String,
    #[serde(default)]
    dependencies: IndexMap<String, String>,
    #[serde(default)]
    target_dependencies: IndexMap<String, IndexMap<String, String>>,
    #[serde(default)]
    bin: Option<BinSpec>,
    #[serde(default)]
    extra_includes: Vec<String>,
    #[serde(default)]
    extra_sys_includes: Vec<String>,
    #[serde(default)]
    extra_objc_flags: Vec<String>,
}

/// An installed component.
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    version: Version,
    path: PathBuf,

    /// Dependencies for every target, in declaration order
    dependencies: IndexMap<String, String>,

    /// Extra dependencies keyed by the target-like name that enables them
    target_dependencies: IndexMap<String, IndexMap<String, String>>,

    /// Subdirectory -> executable name
    binaries: BTreeMap<String, String>,

    ignore: IgnoreList,

    extra_includes: Vec<String>,
    extra_sys_includes: Vec<String>,
    extra_objc_flags: Vec<String>,
}

impl Component {
    /// Create a component with no dependencies or extra contributions.
    pub fn new(name: impl Into<String>, version: Version, path: impl Into<PathBuf>) -> Self {
        Component {
            name: name.into(),
            version,
            path: path.into(),
            dependencies: IndexMap::new(),
            target_dependencies: IndexMap::new(),
            binaries: BTreeMap::new(),
            ignore: IgnoreList::default(),
            extra_includes: Vec::new(),
            extra_sys_includes: Vec::new(),
            extra_objc_flags: Vec::new(),
        }
    }

    /// Load a component from its root directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let module_path = dir.join(MODULE_FILE);
        let contents = std::fs::read_to_string(&module_path)
            .with_context(|| format!("failed to read {}", module_path.display()))?;
        let raw: RawModule = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", module_path.display()))?;

        let version: Version = raw
            .version
            .parse()
            .with_context(|| format!("invalid version `{}` for `{}`", raw.version, raw.name))?;

        let ignore = IgnoreList::load(&dir.join(IGNORE_FILE))?;

        let mut component = Component::new(raw.name, version, dir);
        component.dependencies = raw.dependencies;
        component.target_dependencies = raw.target_dependencies;
        component.binaries = match raw.bin {
            Some(BinSpec::Dir(dir)) => BTreeMap::from([(dir, component.name.clone())]),
            Some(BinSpec::Map(map)) => map,
            None => BTreeMap::new(),
        }
        .into_iter()
        .map(|(dir, exe)| (normalize_subdir(&dir), exe))
        .collect();
        component.ignore = ignore;
        component.extra_includes = raw.extra_includes;
        component.extra_sys_includes = raw.extra_sys_includes;
        component.extra_objc_flags = raw.extra_objc_flags;

        Ok(component)
    }

    /// Add a dependency for all targets.
    pub fn with_dependency(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), spec.into());
        self
    }

    /// Add a dependency only for targets like `target`.
    pub fn with_target_dependency(
        mut self,
        target: impl Into<String>,
        name: impl Into<String>,
        spec: impl Into<String>,
    ) -> Self {
        self.target_dependencies
            .entry(target.into())
            .or_default()
            .insert(name.into(), spec.into());
        self
    }

    /// Build an executable from `subdir`.
    pub fn with_binary(mut self, subdir: &str, exe: impl Into<String>) -> Self {
        self.binaries.insert(normalize_subdir(subdir), exe.into());
        self
    }

    pub fn with_ignore(mut self, ignore: IgnoreList) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_extra_includes(mut self, dirs: Vec<String>) -> Self {
        self.extra_includes = dirs;
        self
    }

    pub fn with_extra_sys_includes(mut self, dirs: Vec<String>) -> Self {
        self.extra_sys_includes = dirs;
        self
    }

    pub fn with_extra_objc_flags(mut self, flags: Vec<String>) -> Self {
        self.extra_objc_flags = flags;
        self
    }

    /// Get the component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the component version.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Get the component root directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dependencies declared for every target.
    pub fn dependencies(&self) -> &IndexMap<String, String> {
        &self.dependencies
    }

    /// Dependencies that apply when building for a target whose resolution
    /// order is `target_like`, in declaration order.
    ///
    /// Base dependencies come first; each matching target block follows in
    /// the order of `target_like`. A name already present is not replaced.
    pub fn dependencies_for<'a>(
        &'a self,
        target_like: impl IntoIterator<Item = &'a str>,
    ) -> IndexMap<&'a str, &'a str> {
        let mut deps: IndexMap<&str, &str> = self
            .dependencies
            .iter()
            .map(|(n, s)| (n.as_str(), s.as_str()))
            .collect();

        for like in target_like {
            if let Some(extra) = self.target_dependencies.get(like) {
                for (name, spec) in extra {
                    deps.entry(name.as_str()).or_insert(spec.as_str());
                }
            }
        }
        deps
    }

    /// Subdirectory -> executable name for binary-producing subdirectories.
    pub fn binaries(&self) -> &BTreeMap<String, String> {
        &self.binaries
    }

    /// Whether `relative_path` (relative to the component root) is ignored.
    pub fn ignores(&self, relative_path: &Path) -> bool {
        self.ignore.matches(relative_path)
    }

    /// Include directories exported as system headers, relative to the root.
    pub fn extra_sys_includes(&self) -> &[String] {
        &self.extra_sys_includes
    }

    /// Include directories exported as ordinary headers, relative to the root.
    pub fn extra_includes(&self) -> &[String] {
        &self.extra_includes
    }

    /// Objective-C compiler flags this component contributes to its dependents.
    pub fn extra_objc_flags(&self) -> &[String] {
        &self.extra_objc_flags
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// `./source/` and `source` name the same subdirectory.
fn normalize_subdir(dir: &str) -> String {
    let trimmed = dir.trim_end_matches(['/', '\\']);
    trimmed
        .strip_prefix("./")
        .or_else(|| trimmed.strip_prefix(".\\"))
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_module_json() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(MODULE_FILE),
            r#"{
                "name": "widget",
                "version": "1.2.3",
                "dependencies": { "zeta": "^1.0.0", "alpha": "~0.3.0" },
                "targetDependencies": { "mbed": { "mbed-hal": "*" } },
                "bin": "./source/",
                "extraIncludes": ["cmsis"],
                "extraSysIncludes": ["libc"],
                "extraObjcFlags": ["-fobjc-arc"]
            }"#,
        )
        .unwrap();

        let c = Component::load(tmp.path()).unwrap();
        assert_eq!(c.name(), "widget");
        assert_eq!(c.version(), &Version::new(1, 2, 3));

        // Declaration order is kept.
        let names: Vec<_> = c.dependencies().keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);

        assert_eq!(c.binaries().get("source").map(String::as_str), Some("widget"));
        assert_eq!(c.extra_includes(), &["cmsis".to_string()]);
        assert_eq!(c.extra_sys_includes(), &["libc".to_string()]);
        assert_eq!(c.extra_objc_flags(), &["-fobjc-arc".to_string()]);
    }

    #[test]
    fn test_load_rejects_bad_version() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(MODULE_FILE),
            r#"{ "name": "widget", "version": "not-a-version" }"#,
        )
        .unwrap();

        let err = Component::load(tmp.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid version"));
    }

    #[test]
    fn test_dependencies_for_target() {
        let c = Component::new("app", Version::new(0, 1, 0), "/tmp/app")
            .with_dependency("core", "*")
            .with_target_dependency("mbed", "mbed-hal", "*")
            .with_target_dependency("linux", "posix-shim", "*")
            .with_target_dependency("frdm-k64f-gcc", "core", "^2.0.0");

        let deps = c.dependencies_for(["frdm-k64f-gcc", "mbed"]);
        let names: Vec<_> = deps.keys().copied().collect();
        assert_eq!(names, vec!["core", "mbed-hal"]);
        // The base spec is not replaced by a target block.
        assert_eq!(deps["core"], "*");
    }

    #[test]
    fn test_binary_map_normalized() {
        let c = Component::new("tool", Version::new(1, 0, 0), "/tmp/tool")
            .with_binary("./cli/", "tool-cli");
        assert_eq!(c.binaries().get("cli").map(String::as_str), Some("tool-cli"));
    }
}
