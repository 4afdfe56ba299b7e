//! Catalog of installed components.
//!
//! The catalog answers "which installed component satisfies this name" for a
//! target. Version constraints were already settled by whoever installed the
//! components, so lookups are by name only.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::core::component::{Component, MODULE_FILE};
use crate::core::target::Target;

/// Dependency name -> installed component, or `None` when nothing is
/// installed under that name. Iteration order is resolution order.
pub type DependencyMap<'a> = IndexMap<String, Option<&'a Component>>;

/// All components available to one generation run, keyed by name.
#[derive(Debug, Default)]
pub struct ComponentCatalog {
    components: IndexMap<String, Component>,
}

impl ComponentCatalog {
    pub fn new() -> Self {
        ComponentCatalog::default()
    }

    /// Add a component, replacing any previous one with the same name.
    pub fn insert(&mut self, component: Component) {
        self.components
            .insert(component.name().to_string(), component);
    }

    /// Build a catalog from a root component and the components installed
    /// one level below `modules_dir`.
    ///
    /// Directories without a `module.json` are skipped. A module that fails
    /// to load is an error: it is installed, so it must be readable.
    pub fn load(root: Component, modules_dir: &Path) -> Result<Self> {
        let mut catalog = ComponentCatalog::new();
        catalog.insert(root);

        if !modules_dir.is_dir() {
            tracing::debug!("no modules directory at {}", modules_dir.display());
            return Ok(catalog);
        }

        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(modules_dir)
            .with_context(|| format!("failed to read directory: {}", modules_dir.display()))?
        {
            let path = entry?.path();
            if path.join(MODULE_FILE).is_file() {
                dirs.push(path);
            }
        }
        dirs.sort();

        for dir in dirs {
            let component = Component::load(&dir)?;
            tracing::debug!("found installed component {}", component);
            // The root always wins over an installed copy of itself.
            if !catalog.contains(component.name()) {
                catalog.insert(component);
            }
        }

        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Immediate dependencies of `component` for `target`, in declaration
    /// order. Without a target only the target-independent dependencies are
    /// considered.
    pub fn dependencies(&self, component: &Component, target: Option<&Target>) -> DependencyMap<'_> {
        let order = target
            .map(|t| t.dependency_resolution_order())
            .unwrap_or_default();

        component
            .dependencies_for(order)
            .into_keys()
            .map(|name| (name.to_string(), self.get(name)))
            .collect()
    }

    /// Every component reachable from `component` for `target`, breadth
    /// first, excluding `component` itself. Missing names are kept as `None`
    /// and not expanded further.
    pub fn dependencies_recursive(
        &self,
        component: &Component,
        target: Option<&Target>,
    ) -> DependencyMap<'_> {
        let mut closure = DependencyMap::new();
        let mut seen: HashSet<String> = HashSet::from([component.name().to_string()]);
        let mut queue: VecDeque<&Component> = VecDeque::from([component]);

        while let Some(current) = queue.pop_front() {
            for (name, dep) in self.dependencies(current, target) {
                if !seen.insert(name.clone()) {
                    continue;
                }
                if let Some(dep) = dep {
                    queue.push_back(dep);
                }
                closure.insert(name, dep);
            }
        }

        closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn component(name: &str, deps: &[&str]) -> Component {
        deps.iter().fold(
            Component::new(name, Version::new(1, 0, 0), format!("/c/{}", name)),
            |c, d| c.with_dependency(*d, "*"),
        )
    }

    fn catalog(components: Vec<Component>) -> ComponentCatalog {
        let mut catalog = ComponentCatalog::new();
        for c in components {
            catalog.insert(c);
        }
        catalog
    }

    #[test]
    fn test_immediate_dependencies_report_missing() {
        let cat = catalog(vec![component("app", &["lib", "gone"]), component("lib", &[])]);
        let app = cat.get("app").unwrap();

        let deps = cat.dependencies(app, None);
        assert_eq!(deps.len(), 2);
        assert!(deps["lib"].is_some());
        assert!(deps["gone"].is_none());
    }

    #[test]
    fn test_recursive_is_breadth_first_and_deduplicated() {
        let cat = catalog(vec![
            component("app", &["a", "b"]),
            component("a", &["c"]),
            component("b", &["c", "a"]),
            component("c", &[]),
        ]);
        let app = cat.get("app").unwrap();

        let closure = cat.dependencies_recursive(app, None);
        let names: Vec<_> = closure.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_recursive_terminates_on_cycles() {
        let cat = catalog(vec![
            component("app", &["app", "a"]),
            component("a", &["app"]),
        ]);
        let app = cat.get("app").unwrap();

        let closure = cat.dependencies_recursive(app, None);
        let names: Vec<_> = closure.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_target_dependencies_only_for_matching_target() {
        let app = component("app", &[]).with_target_dependency("linux", "posix", "*");
        let cat = catalog(vec![app, component("posix", &[])]);
        let app = cat.get("app").unwrap();

        assert!(cat.dependencies(app, None).is_empty());

        let linux = Target::new("x86-linux", "/t.cmake").with_similar_to(vec!["linux".into()]);
        let deps = cat.dependencies(app, Some(&linux));
        assert!(deps["posix"].is_some());
    }
}
