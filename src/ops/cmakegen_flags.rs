//! Implementation of `cmakegen flags`.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::closure::{aggregate, IncludePaths};
use crate::builder::cmakegen::target_definitions;
use crate::builder::GenerateWarning;
use crate::ops::cmakegen_generate::load_tree;
use crate::util::diagnostic::suggestions;

/// Options for the flags command.
#[derive(Debug, Clone, Default)]
pub struct FlagsOptions {
    /// Root component directory
    pub path: PathBuf,

    /// Directory containing `target.json`
    pub target_dir: PathBuf,

    /// Global config file, if any
    pub global_config: Option<PathBuf>,
}

/// Closure-wide compile settings for the root component.
#[derive(Debug, Clone)]
pub struct FlagsReport {
    pub component: String,
    pub target: String,
    pub includes: IncludePaths,
    pub definitions: Vec<String>,
    /// Merged Objective-C flags, space-separated
    pub objc_flags: String,
    pub collisions: Vec<GenerateWarning>,
    /// Immediate dependencies with no installed component
    pub missing: Vec<String>,
}

/// Compute the include paths, definitions and Objective-C flags the root
/// component's top-level build file would carry. Nothing is written.
pub fn flags(opts: &FlagsOptions) -> Result<FlagsReport> {
    let tree = load_tree(&opts.path, &opts.target_dir, opts.global_config.as_deref())?;

    let Some(target) = tree.target.as_ref() else {
        anyhow::bail!(
            "no valid target in `{}`\n{}",
            opts.target_dir.display(),
            suggestions::TARGET_NOT_SET
        );
    };

    let closure = tree.catalog.dependencies_recursive(&tree.root, Some(target));
    let missing = closure
        .iter()
        .filter(|(_, dep)| dep.is_none())
        .map(|(name, _)| name.clone())
        .collect();
    let aggregate = aggregate(&tree.root, &closure);

    Ok(FlagsReport {
        component: tree.root.name().to_string(),
        target: target.name().to_string(),
        includes: aggregate.includes,
        definitions: target_definitions(target),
        objc_flags: aggregate.objc_flags.joined(),
        collisions: aggregate.objc_flags.collisions,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::TARGET_FILE;
    use crate::test_support::ComponentFixture;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_flags_for_closure() {
        let fx = ComponentFixture::library("app")
            .dependency("libc")
            .dependency("gone")
            .installed(
                ComponentFixture::library("libc")
                    .extra_sys_includes(&["include"])
                    .objc_flags(&["-fobjc-arc"]),
            )
            .write();
        let targets = TempDir::new().unwrap();
        fs::write(
            targets.path().join(TARGET_FILE),
            r#"{"name": "x86-linux", "toolchain": "t.cmake"}"#,
        )
        .unwrap();

        let report = flags(&FlagsOptions {
            path: fx.path().to_path_buf(),
            target_dir: targets.path().to_path_buf(),
            global_config: None,
        })
        .unwrap();

        assert_eq!(report.component, "app");
        assert_eq!(report.includes.root.len(), 2);
        assert_eq!(
            report.includes.system,
            vec![fx.modules_dir().join("libc").join("include")]
        );
        assert_eq!(report.objc_flags, "-fobjc-arc");
        assert_eq!(report.definitions[0], "-DTARGET=X86_LINUX");
        assert_eq!(report.missing, vec!["gone"]);
    }

    #[test]
    fn test_flags_requires_target() {
        let fx = ComponentFixture::library("app").write();
        let err = flags(&FlagsOptions {
            path: fx.path().to_path_buf(),
            target_dir: fx.path().join("missing"),
            global_config: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("no valid target"));
    }
}
