//! Implementation of `cmakegen generate`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::{CMakeGen, GenerateReport};
use crate::core::component::MODULE_FILE;
use crate::core::{Component, ComponentCatalog, Target};
use crate::util::config::{load_config, project_config_path, Config};
use crate::util::diagnostic::suggestions;
use crate::util::fs::absolute;

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Root component directory
    pub path: PathBuf,

    /// Directory containing `target.json`
    pub target_dir: PathBuf,

    /// Output directory (default: `<path>/build/<target name>`)
    pub build_dir: Option<PathBuf>,

    /// Global config file, if any
    pub global_config: Option<PathBuf>,
}

/// Everything loaded from disk before generation starts.
#[derive(Debug)]
pub struct ComponentTree {
    pub root: Component,
    pub catalog: ComponentCatalog,
    /// `None` when the target could not be loaded
    pub target: Option<Target>,
    pub config: Config,
}

/// Result of a generate run.
#[derive(Debug)]
pub struct GenerateOutput {
    pub build_dir: PathBuf,
    pub report: GenerateReport,
}

/// Load the root component, installed components, target and config.
///
/// A target that fails to load is logged and left as `None`; the generator
/// reports it per component. A root without a readable `module.json` is an
/// error.
pub fn load_tree(
    path: &Path,
    target_dir: &Path,
    global_config: Option<&Path>,
) -> Result<ComponentTree> {
    // Generated files reference sources from the build tree, so every path
    // below must be absolute.
    let path = &absolute(path)?;
    let target_dir = &absolute(target_dir)?;

    if !path.join(MODULE_FILE).is_file() {
        anyhow::bail!(
            "could not find `{}` in `{}`\n{}",
            MODULE_FILE,
            path.display(),
            suggestions::NO_MODULE
        );
    }

    let config = load_config(global_config, &project_config_path(path));

    let root = Component::load(path)
        .with_context(|| format!("failed to load component at {}", path.display()))?;

    let modules_dir = path.join(config.modules_dir());
    let catalog = ComponentCatalog::load(root.clone(), &modules_dir)?;
    tracing::debug!("{} component(s) available", catalog.len());

    let target = match Target::load(target_dir) {
        Ok(target) => Some(target),
        Err(e) => {
            tracing::warn!("{:#}", e);
            None
        }
    };

    Ok(ComponentTree {
        root,
        catalog,
        target,
        config,
    })
}

/// Default build directory for a target.
fn default_build_dir(path: &Path, target: Option<&Target>, target_dir: &Path) -> PathBuf {
    let name = target
        .map(|t| t.name().to_string())
        .or_else(|| {
            target_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "default".to_string());
    path.join("build").join(name)
}

/// Generate the build tree described by `opts`.
pub fn generate(opts: &GenerateOptions) -> Result<GenerateOutput> {
    let tree = load_tree(&opts.path, &opts.target_dir, opts.global_config.as_deref())?;

    let build_dir = match &opts.build_dir {
        Some(dir) => absolute(dir)?,
        None => default_build_dir(tree.root.path(), tree.target.as_ref(), &opts.target_dir),
    };

    let gen = CMakeGen::new(&build_dir, tree.target).with_config(tree.config);
    let report = gen.generate_recursive(&tree.root, &tree.catalog)?;

    Ok(GenerateOutput { build_dir, report })
}
