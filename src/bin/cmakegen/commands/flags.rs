//! `cmakegen flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use cmakegen::ops::cmakegen_flags::{flags, FlagsOptions};
use cmakegen::util::config::global_config_path;
use cmakegen::util::diagnostic::{emit, Diagnostic};
use cmakegen::util::fs::cmake_path;

pub fn execute(args: FlagsArgs, color: bool) -> Result<bool> {
    let report = flags(&FlagsOptions {
        path: args.path,
        target_dir: args.target,
        global_config: global_config_path(),
    })?;

    println!(
        "# Include directories for `{}` (target {}):",
        report.component, report.target
    );
    for dir in &report.includes.root {
        println!("  -I{}", cmake_path(dir));
    }
    for dir in &report.includes.system {
        println!("  -isystem {}", cmake_path(dir));
    }
    for dir in &report.includes.other {
        println!("  -I{}    # extra", cmake_path(dir));
    }

    println!();
    println!("# Definitions:");
    for def in &report.definitions {
        println!("  {}", def);
    }

    if !report.objc_flags.is_empty() {
        println!();
        println!("# Objective-C flags:");
        println!("  {}", report.objc_flags);
    }

    for name in &report.missing {
        tracing::warn!("dependency `{}` is not installed", name);
    }
    if !report.collisions.is_empty() {
        let summary = Diagnostic::note(format!(
            "{} Objective-C flag collision(s) in this closure",
            report.collisions.len()
        ))
        .with_context("both flags are kept; the later one takes effect");
        emit(&summary, color);
    }

    Ok(true)
}
