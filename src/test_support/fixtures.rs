//! Test fixtures for component trees on a real filesystem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tempfile::TempDir;

use crate::core::component::{IGNORE_FILE, MODULE_FILE};
use crate::core::Component;
use crate::util::config::DEFAULT_MODULES_DIR;

/// Fixture for one component: its `module.json`, files, and any installed
/// dependencies.
#[derive(Debug, Clone)]
pub struct ComponentFixture {
    /// Component name.
    pub name: String,
    pub version: String,
    dependencies: Vec<String>,
    target_dependencies: Vec<(String, String)>,
    binaries: BTreeMap<String, String>,
    extra_includes: Vec<String>,
    extra_sys_includes: Vec<String>,
    objc_flags: Vec<String>,
    ignore: Vec<String>,
    /// Files (path relative to component root -> content).
    files: BTreeMap<PathBuf, String>,
    /// Components installed into this one's modules directory.
    installed: Vec<ComponentFixture>,
}

impl ComponentFixture {
    pub fn new(name: impl Into<String>) -> Self {
        ComponentFixture {
            name: name.into(),
            version: "1.0.0".to_string(),
            dependencies: Vec::new(),
            target_dependencies: Vec::new(),
            binaries: BTreeMap::new(),
            extra_includes: Vec::new(),
            extra_sys_includes: Vec::new(),
            objc_flags: Vec::new(),
            ignore: Vec::new(),
            files: BTreeMap::new(),
            installed: Vec::new(),
        }
    }

    /// A component with a single C file in `source/`.
    pub fn library(name: impl Into<String>) -> Self {
        let name = name.into();
        let body = format!("int {}_init(void) {{ return 0; }}\n", name.replace(['-', '.'], "_"));
        ComponentFixture::new(name).file("source/lib.c", &body)
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Declare a dependency for all targets.
    pub fn dependency(mut self, name: &str) -> Self {
        self.dependencies.push(name.to_string());
        self
    }

    /// Declare a dependency only for targets like `target`.
    pub fn target_dependency(mut self, target: &str, name: &str) -> Self {
        self.target_dependencies
            .push((target.to_string(), name.to_string()));
        self
    }

    pub fn binary(mut self, subdir: &str, exe: &str) -> Self {
        self.binaries.insert(subdir.to_string(), exe.to_string());
        self
    }

    pub fn extra_includes(mut self, dirs: &[&str]) -> Self {
        self.extra_includes.extend(dirs.iter().map(|d| d.to_string()));
        self
    }

    pub fn extra_sys_includes(mut self, dirs: &[&str]) -> Self {
        self.extra_sys_includes
            .extend(dirs.iter().map(|d| d.to_string()));
        self
    }

    pub fn objc_flags(mut self, flags: &[&str]) -> Self {
        self.objc_flags.extend(flags.iter().map(|f| f.to_string()));
        self
    }

    /// Add a line to `.yotta_ignore`.
    pub fn ignore(mut self, pattern: &str) -> Self {
        self.ignore.push(pattern.to_string());
        self
    }

    /// Add a file.
    pub fn file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files.insert(path.into(), content.to_string());
        self
    }

    /// Install another component into this one's modules directory.
    pub fn installed(mut self, dep: ComponentFixture) -> Self {
        self.installed.push(dep);
        self
    }

    fn module_json(&self) -> Value {
        let mut module = Map::new();
        module.insert("name".into(), json!(self.name));
        module.insert("version".into(), json!(self.version));

        let deps: Map<String, Value> = self
            .dependencies
            .iter()
            .map(|d| (d.clone(), json!("*")))
            .collect();
        module.insert("dependencies".into(), Value::Object(deps));

        if !self.target_dependencies.is_empty() {
            let mut by_target = Map::new();
            for (target, name) in &self.target_dependencies {
                let entry = by_target
                    .entry(target.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(block) = entry {
                    block.insert(name.clone(), json!("*"));
                }
            }
            module.insert("targetDependencies".into(), Value::Object(by_target));
        }
        if !self.binaries.is_empty() {
            module.insert("bin".into(), json!(self.binaries));
        }
        if !self.extra_includes.is_empty() {
            module.insert("extraIncludes".into(), json!(self.extra_includes));
        }
        if !self.extra_sys_includes.is_empty() {
            module.insert("extraSysIncludes".into(), json!(self.extra_sys_includes));
        }
        if !self.objc_flags.is_empty() {
            module.insert("extraObjcFlags".into(), json!(self.objc_flags));
        }
        Value::Object(module)
    }

    /// Write this fixture to `base_path/<name>`, returning the component root.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        let root = base_path.join(&self.name);
        std::fs::create_dir_all(&root)?;

        let module = serde_json::to_string_pretty(&self.module_json())?;
        std::fs::write(root.join(MODULE_FILE), module)?;

        if !self.ignore.is_empty() {
            std::fs::write(root.join(IGNORE_FILE), self.ignore.join("\n"))?;
        }

        for (rel_path, content) in &self.files {
            let full_path = root.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        let modules_dir = root.join(DEFAULT_MODULES_DIR);
        for dep in &self.installed {
            dep.write_to(&modules_dir)?;
        }

        Ok(root)
    }

    /// Write this fixture into a fresh temporary directory.
    pub fn write(&self) -> FixtureDir {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let root = self
            .write_to(tmp.path())
            .expect("failed to write component fixture");
        FixtureDir { _tmp: tmp, root }
    }
}

/// A written fixture; the directory is removed on drop.
pub struct FixtureDir {
    _tmp: TempDir,
    root: PathBuf,
}

impl FixtureDir {
    /// Component root directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.root.join(DEFAULT_MODULES_DIR)
    }

    /// Load the root component.
    pub fn component(&self) -> Component {
        Component::load(&self.root).expect("fixture component should load")
    }

    /// A scratch directory beside the component, for build output.
    pub fn build_dir(&self) -> PathBuf {
        self.root
            .parent()
            .map(|p| p.join("build"))
            .unwrap_or_else(|| self.root.join("build"))
    }
}
