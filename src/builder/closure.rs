//! Include-path and flag aggregation across a dependency closure.
//!
//! C-family includes are transitive: a component's headers may include the
//! headers of anything it depends on, directly or not. So every generated
//! top-level file lists the include directories of the whole closure.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::builder::errors::GenerateWarning;
use crate::core::catalog::DependencyMap;
use crate::core::Component;

/// Include directories for a closure, grouped by how they are declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncludePaths {
    /// Root directory of the component and of every dependency
    pub root: Vec<PathBuf>,
    /// Headers included as system headers (warnings suppressed)
    pub system: Vec<PathBuf>,
    /// Extra non-system header directories
    pub other: Vec<PathBuf>,
}

/// Merged Objective-C flags for a closure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedFlags {
    /// Every contributed flag, in contribution order. Nothing is dropped.
    pub flags: Vec<String>,
    /// One warning per flag that re-sets a name another component set
    pub collisions: Vec<GenerateWarning>,
}

impl MergedFlags {
    /// Flags joined for a single CMake string.
    pub fn joined(&self) -> String {
        self.flags.join(" ")
    }
}

/// Everything a component's top-level build file needs from its closure.
#[derive(Debug, Clone, Default)]
pub struct ClosureAggregate {
    pub includes: IncludePaths,
    pub objc_flags: MergedFlags,
}

/// Aggregate includes and flags for `component` and its transitive
/// dependencies. Missing dependencies contribute nothing.
pub fn aggregate(component: &Component, closure: &DependencyMap<'_>) -> ClosureAggregate {
    ClosureAggregate {
        includes: include_paths(component, closure),
        objc_flags: merge_objc_flags(component, closure),
    }
}

/// Include directories of the component itself, then each dependency in
/// closure order.
pub fn include_paths(component: &Component, closure: &DependencyMap<'_>) -> IncludePaths {
    let mut includes = IncludePaths::default();
    let members = std::iter::once(component).chain(closure.values().flatten().copied());

    for c in members {
        includes.root.push(c.path().to_path_buf());
        includes
            .system
            .extend(c.extra_sys_includes().iter().map(|d| c.path().join(d)));
        includes
            .other
            .extend(c.extra_includes().iter().map(|d| c.path().join(d)));
    }
    includes
}

/// Merge Objective-C flags: dependencies in closure order, then the
/// component itself, so the component's own flags come last.
///
/// When a flag re-sets a canonical name (see [`flag_name`]) last set by a
/// different component, a collision warning is recorded. Both flags stay in
/// the merged list; the downstream compiler applies the later one.
pub fn merge_objc_flags(component: &Component, closure: &DependencyMap<'_>) -> MergedFlags {
    let mut merged = MergedFlags::default();
    let mut set_by: HashMap<&str, &str> = HashMap::new();

    let members = closure
        .values()
        .flatten()
        .copied()
        .chain(std::iter::once(component));

    for c in members {
        for flag in c.extra_objc_flags() {
            if let Some(name) = flag_name(flag) {
                if let Some(previous) = set_by.get(name) {
                    if *previous != c.name() {
                        let warning = GenerateWarning::FlagCollision {
                            flag_name: name.to_string(),
                            flag: flag.clone(),
                            component: c.name().to_string(),
                            previous: previous.to_string(),
                        };
                        tracing::warn!("{}", warning);
                        merged.collisions.push(warning);
                    }
                }
                set_by.insert(name, c.name());
            }
            merged.flags.push(flag.clone());
        }
    }
    merged
}

/// Canonical name of a flag, used only to detect collisions.
///
/// `name=value` gives `name`; `-fno-x`, `-fnox` and `-fx` give `x`. Other
/// flags have no name and never collide. This is a heuristic and can alias
/// unrelated flags that share a stem.
pub fn flag_name(flag: &str) -> Option<&str> {
    if flag.matches('=').count() == 1 {
        return flag.split('=').next();
    }
    flag.strip_prefix("-fno-")
        .or_else(|| flag.strip_prefix("-fno"))
        .or_else(|| flag.strip_prefix("-f"))
}
