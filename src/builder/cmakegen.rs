//! CMake tree generation.
//!
//! `CMakeGen` walks a component and its dependencies and writes one
//! top-level `CMakeLists.txt` per component, plus one per generated source,
//! test or dummy-library directory. Each dependency is generated once, under
//! the build directory of the first component that reaches it:
//!
//! ```text
//! <build>/CMakeLists.txt           root component
//! <build>/source/CMakeLists.txt    generated source directory
//! <build>/ym/<dep>/CMakeLists.txt  first-reached dependency
//! <build>/ym/<dep>/ym/<dep2>/...
//! ```
//!
//! Recoverable problems are collected in a [`GenerateReport`] and every file
//! that can still be written is written. Only I/O failures and
//! [`GenerateError::UnsupportedDirectory`] abort the run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::builder::closure::aggregate;
use crate::builder::descriptor::{
    dummy_lib_descriptor, source_dir_descriptor, test_dir_descriptor, Bootstrap,
    ComponentDescriptor, Subdirectory, DUMMY_C_FILE,
};
use crate::builder::errors::{GenerateError, GenerateWarning};
use crate::builder::survey::{survey_subdirectories, CMAKELISTS};
use crate::core::catalog::{ComponentCatalog, DependencyMap};
use crate::core::target::sanitize_target_name;
use crate::core::{Component, Target};
use crate::util::config::Config;
use crate::util::fs::{write_if_different, WriteOutcome};

/// A generated file and what writing it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

/// Everything a generation run produced besides the files themselves.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub errors: Vec<GenerateError>,
    pub warnings: Vec<GenerateWarning>,
    /// Every generated file, in write order, whether or not it changed
    pub written: Vec<WrittenFile>,
}

impl GenerateReport {
    /// True when no errors were recorded. Warnings do not count.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Files whose contents changed on disk.
    pub fn modified(&self) -> impl Iterator<Item = &WrittenFile> {
        self.written.iter().filter(|f| f.outcome.is_modified())
    }

    fn record(&mut self, path: PathBuf, outcome: WriteOutcome) {
        tracing::debug!("{:?}: {}", outcome, path.display());
        self.written.push(WrittenFile { path, outcome });
    }
}

/// Generator for one build tree.
#[derive(Debug, Clone)]
pub struct CMakeGen {
    build_root: PathBuf,
    target: Option<Target>,
    config: Config,
}

/// Per-component inputs shared by the descriptor builders.
struct GenerateContext<'a> {
    component: &'a Component,
    target: &'a Target,
    builddir: &'a Path,
    toplevel: bool,
    /// Dependencies first reached through this component
    new_dependencies: &'a [&'a Component],
    /// Names of all immediate dependencies, resolved or not
    immediate_dependencies: Vec<String>,
    closure: &'a DependencyMap<'a>,
}

impl CMakeGen {
    /// Create a generator writing under `build_root`. `target` is `None`
    /// when no valid target could be loaded; generation then reports an
    /// error per component instead of writing descriptors.
    pub fn new(build_root: impl Into<PathBuf>, target: Option<Target>) -> Self {
        CMakeGen {
            build_root: build_root.into(),
            target,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Generate build files for `component` and every dependency reachable
    /// from it, each exactly once.
    pub fn generate_recursive(
        &self,
        component: &Component,
        catalog: &ComponentCatalog,
    ) -> Result<GenerateReport> {
        match &self.target {
            Some(target) => tracing::info!("generating {} for target {}", component, target),
            None => tracing::info!("generating {} without a valid target", component),
        }

        let mut report = GenerateReport::default();
        let mut processed = HashSet::new();
        self.generate_component(
            component,
            catalog,
            &self.build_root,
            &mut processed,
            &mut report,
        )?;
        Ok(report)
    }

    fn generate_component(
        &self,
        component: &Component,
        catalog: &ComponentCatalog,
        builddir: &Path,
        processed: &mut HashSet<String>,
        report: &mut GenerateReport,
    ) -> Result<()> {
        let toplevel = processed.is_empty();
        let target = self.target.as_ref();

        if target.is_none() {
            report.errors.push(GenerateError::UnresolvedTarget {
                component: component.name().to_string(),
            });
        }

        tracing::debug!("generate build files: {} ({})", component, builddir.display());

        let immediate = catalog.dependencies(component, target);
        let closure = catalog.dependencies_recursive(component, target);

        for (name, dep) in &immediate {
            if dep.is_none() {
                let error = GenerateError::MissingDependency {
                    component: component.name().to_string(),
                    dependency: name.clone(),
                };
                tracing::debug!("{}", error);
                report.errors.push(error);
            }
        }

        // Marked before recursing so a cycle back to this component stops here.
        processed.insert(component.name().to_string());
        let new_dependencies: Vec<&Component> = immediate
            .values()
            .flatten()
            .copied()
            .filter(|dep| !processed.contains(dep.name()))
            .collect();

        if let Some(target) = target {
            let ctx = GenerateContext {
                component,
                target,
                builddir,
                toplevel,
                new_dependencies: &new_dependencies,
                immediate_dependencies: immediate.keys().cloned().collect(),
                closure: &closure,
            };
            self.generate(&ctx, report)?;
        }

        tracing::debug!("recursive deps of {}:", component);
        for dep in closure.values().flatten() {
            tracing::debug!("    {}", dep);
        }

        processed.extend(new_dependencies.iter().map(|d| d.name().to_string()));
        for dep in new_dependencies {
            let dep_builddir = self.dependency_build_dir(builddir, dep.name());
            self.generate_component(dep, catalog, &dep_builddir, processed, report)?;
        }

        Ok(())
    }

    fn dependency_build_dir(&self, builddir: &Path, name: &str) -> PathBuf {
        builddir.join(self.config.deps_namespace()).join(name)
    }

    /// Write every build file for one component.
    fn generate(&self, ctx: &GenerateContext<'_>, report: &mut GenerateReport) -> Result<()> {
        let component = ctx.component;
        let cmake_version = self.config.cmake_minimum_version();

        let survey = survey_subdirectories(component, &self.config, &mut report.warnings)?;

        let mut own_subdirs: Vec<Subdirectory> = survey
            .manual
            .iter()
            .map(|dir| Subdirectory {
                source: component.path().join(dir),
                binary: ctx.builddir.join(dir),
            })
            .collect();

        for (dirname, sources) in &survey.auto {
            let dir_build = ctx.builddir.join(dirname);
            let contents = if survey.is_test(dirname) {
                test_dir_descriptor(component, dirname, sources, &ctx.immediate_dependencies)
                    .render()
            } else {
                source_dir_descriptor(
                    component,
                    dirname,
                    sources,
                    &survey,
                    &ctx.immediate_dependencies,
                    cmake_version,
                )?
                .render()
            };
            self.write(&dir_build.join(CMAKELISTS), &contents, report)?;
            own_subdirs.push(Subdirectory {
                source: dir_build.clone(),
                binary: dir_build,
            });
        }

        // Nothing but tests: add a library so the component name links.
        if own_subdirs.len() <= survey.tests.len() {
            let dummy = dummy_lib_descriptor(component, &ctx.immediate_dependencies);
            tracing::debug!("create dummy lib: {}", dummy.dir_name);
            let dummy_dir = ctx.builddir.join(&dummy.dir_name);
            self.write(&dummy_dir.join(DUMMY_C_FILE), &dummy.c_source(), report)?;
            self.write(&dummy_dir.join(CMAKELISTS), &dummy.render(), report)?;
            own_subdirs.push(Subdirectory {
                source: dummy_dir.clone(),
                binary: dummy_dir,
            });
        }

        let aggregate = aggregate(component, ctx.closure);
        // Ancestors share the collisions of their dependencies' closures.
        for collision in &aggregate.objc_flags.collisions {
            if !report.warnings.contains(collision) {
                report.warnings.push(collision.clone());
            }
        }

        let descriptor = ComponentDescriptor {
            component_name: component.name().to_string(),
            component_version: component.version().to_string(),
            bootstrap: ctx.toplevel.then(|| Bootstrap {
                target_name: ctx.target.name().to_string(),
                toolchain_file: ctx.target.toolchain_file().to_path_buf(),
                cmake_minimum_version: cmake_version.to_string(),
                targets_like: targets_like(ctx.target),
            }),
            includes: aggregate.includes,
            objc_flags: aggregate.objc_flags.joined(),
            definitions: target_definitions(ctx.target),
            dependency_subdirs: ctx
                .new_dependencies
                .iter()
                .map(|dep| self.dependency_build_dir(ctx.builddir, dep.name()))
                .collect(),
            own_subdirs,
        };

        self.write(&ctx.builddir.join(CMAKELISTS), &descriptor.render(), report)
    }

    fn write(&self, path: &Path, contents: &str, report: &mut GenerateReport) -> Result<()> {
        let outcome = write_if_different(path, contents)?;
        report.record(path.to_path_buf(), outcome);
        Ok(())
    }
}

/// Sanitized names of the target and each concrete ancestor, target first,
/// without repeats.
pub fn targets_like(target: &Target) -> Vec<String> {
    let mut seen = HashSet::new();
    target
        .concrete_ancestry()
        .map(sanitize_target_name)
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// `-DTARGET=<target>` followed by `-DTARGET_LIKE_<name>` for each entry of
/// [`targets_like`].
pub fn target_definitions(target: &Target) -> Vec<String> {
    std::iter::once(format!("-DTARGET={}", sanitize_target_name(target.name())))
        .chain(
            targets_like(target)
                .into_iter()
                .map(|like| format!("-DTARGET_LIKE_{}", like)),
        )
        .collect()
}
