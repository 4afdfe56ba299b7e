//! CLI integration tests for cmakegen.
//!
//! These tests lay out component trees on disk and run the binary against
//! them.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the cmakegen binary command.
fn cmakegen() -> Command {
    Command::cargo_bin("cmakegen").unwrap()
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a component with a `source/` library and the given dependencies.
fn write_component(dir: &Path, name: &str, deps: &[&str]) {
    let deps: Vec<String> = deps.iter().map(|d| format!("\"{}\": \"*\"", d)).collect();
    fs::create_dir_all(dir.join("source")).unwrap();
    fs::write(
        dir.join("module.json"),
        format!(
            r#"{{"name": "{}", "version": "0.1.0", "dependencies": {{{}}}}}"#,
            name,
            deps.join(", ")
        ),
    )
    .unwrap();
    fs::write(dir.join("source").join("lib.c"), "int f(void) { return 0; }\n").unwrap();
}

/// Write a target and return its directory.
fn write_target(root: &Path, name: &str) -> PathBuf {
    let dir = root.join("targets").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("target.json"),
        format!(
            r#"{{"name": "{}", "similarTo": ["mbed", "*"], "toolchain": "CMake/toolchain.cmake"}}"#,
            name
        ),
    )
    .unwrap();
    dir
}

/// An `app` depending on `util`, both installed, plus a target.
fn project() -> (TempDir, PathBuf, PathBuf) {
    let tmp = temp_dir();
    let app = tmp.path().join("app");
    write_component(&app, "app", &["util"]);
    write_component(&app.join("yotta_modules").join("util"), "util", &[]);
    let target = write_target(tmp.path(), "k64f-gcc");
    (tmp, app, target)
}

// ============================================================================
// cmakegen generate
// ============================================================================

#[test]
fn test_generate_writes_tree() {
    let (tmp, app, target) = project();

    cmakegen()
        .arg("generate")
        .arg("--path")
        .arg(&app)
        .arg("--target")
        .arg(&target)
        .env("XDG_CONFIG_HOME", tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated"));

    let build = app.join("build").join("k64f-gcc");
    let top = fs::read_to_string(build.join("CMakeLists.txt")).unwrap();
    assert!(top.starts_with("# NOTE: This file is generated by yotta"));
    assert!(top.contains("project(app)"));
    assert!(top.contains("-DTARGET=K64F_GCC"));
    assert!(top.contains("set(TARGET_LIKE_MBED TRUE)"));

    assert!(build.join("source/CMakeLists.txt").is_file());
    assert!(build.join("ym/util/CMakeLists.txt").is_file());
    assert!(build.join("ym/util/source/CMakeLists.txt").is_file());
}

#[test]
fn test_generate_custom_build_dir() {
    let (tmp, app, target) = project();
    let build = tmp.path().join("out");

    cmakegen()
        .args(["generate", "--path"])
        .arg(&app)
        .arg("--target")
        .arg(&target)
        .arg("--build-dir")
        .arg(&build)
        .env("XDG_CONFIG_HOME", tmp.path())
        .assert()
        .success();

    assert!(build.join("CMakeLists.txt").is_file());
    assert!(!app.join("build").exists());
}

#[test]
fn test_generate_missing_dependency_fails_but_writes() {
    let tmp = temp_dir();
    let app = tmp.path().join("app");
    write_component(&app, "app", &["missing-dep"]);
    let target = write_target(tmp.path(), "k64f-gcc");

    cmakegen()
        .arg("generate")
        .arg("--path")
        .arg(&app)
        .arg("--target")
        .arg(&target)
        .env("XDG_CONFIG_HOME", tmp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing-dep"))
        .stderr(predicate::str::contains("app"));

    assert!(app.join("build/k64f-gcc/CMakeLists.txt").is_file());
}

#[test]
fn test_generate_json_events() {
    let (tmp, app, target) = project();

    let output = cmakegen()
        .arg("generate")
        .arg("--path")
        .arg(&app)
        .arg("--target")
        .arg(&target)
        .args(["--message-format", "json"])
        .env("XDG_CONFIG_HOME", tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert!(events
        .iter()
        .any(|e| e["reason"] == "file-generated" && e["outcome"] == "created"));
    let last = events.last().unwrap();
    assert_eq!(last["reason"], "generate-finished");
    assert_eq!(last["success"], true);
}

#[test]
fn test_generate_twice_reports_nothing_updated() {
    let (tmp, app, target) = project();

    for _ in 0..2 {
        cmakegen()
            .arg("generate")
            .arg("--path")
            .arg(&app)
            .arg("--target")
            .arg(&target)
            .env("XDG_CONFIG_HOME", tmp.path())
            .assert()
            .success();
    }

    cmakegen()
        .arg("generate")
        .arg("--path")
        .arg(&app)
        .arg("--target")
        .arg(&target)
        .env("XDG_CONFIG_HOME", tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("0 updated"));
}

#[test]
fn test_generate_without_module_json() {
    let tmp = temp_dir();
    let target = write_target(tmp.path(), "k64f-gcc");

    cmakegen()
        .arg("generate")
        .arg("--path")
        .arg(tmp.path())
        .arg("--target")
        .arg(&target)
        .env("XDG_CONFIG_HOME", tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("module.json"));
}

#[test]
fn test_generate_invalid_target_fails() {
    let (tmp, app, _) = project();

    cmakegen()
        .arg("generate")
        .arg("--path")
        .arg(&app)
        .arg("--target")
        .arg(tmp.path().join("nope"))
        .env("XDG_CONFIG_HOME", tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid build target"));
}

// ============================================================================
// cmakegen flags
// ============================================================================

#[test]
fn test_flags_lists_closure_includes() {
    let (tmp, app, target) = project();

    cmakegen()
        .arg("flags")
        .arg("--path")
        .arg(&app)
        .arg("--target")
        .arg(&target)
        .env("XDG_CONFIG_HOME", tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("# Include directories for `app`"))
        .stdout(predicate::str::contains("yotta_modules"))
        .stdout(predicate::str::contains("-DTARGET_LIKE_MBED"));
}

#[test]
fn test_help_lists_commands() {
    cmakegen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("flags"));
}
