//! CMake text rendering for descriptor values.
//!
//! Statement kinds and names here are consumed by CMake and by build
//! scripts that key off `YOTTA_AUTO_*_FILES` and `TARGET_LIKE_*`, so they
//! must stay stable.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::builder::descriptor::{
    ArtifactKind, ComponentDescriptor, DummyLibDescriptor, SourceDirDescriptor,
    TestDirDescriptor, DUMMY_C_FILE,
};
use crate::builder::sources::SourceLanguage;
use crate::util::fs::cmake_path;

/// First line of every generated build file.
pub const BANNER: &str = "# NOTE: This file is generated by yotta: changes will be overwritten!";

/// Variable holding the resource files of a directory.
const RESOURCE_VAR: &str = "YOTTA_AUTO_RESOURCE_FILES";

/// Name of the per-language file list variable.
pub fn files_var(lang: SourceLanguage) -> String {
    format!("YOTTA_AUTO_{}_FILES", lang.cmake_upper())
}

fn quoted(path: &Path) -> String {
    format!("\"{}\"", cmake_path(path))
}

/// `command(head\n    item\n    ...\n)` with one item per line.
fn block(out: &mut String, head: &str, items: impl IntoIterator<Item = String>) {
    let _ = writeln!(out, "{}", head);
    for item in items {
        let _ = writeln!(out, "    {}", item);
    }
    out.push_str(")\n\n");
}

fn link_libraries(out: &mut String, object_name: &str, deps: &[String]) {
    block(
        out,
        &format!("target_link_libraries({}", object_name),
        deps.iter().cloned(),
    );
}

fn objc_compile_flags(out: &mut String, object_name: &str) {
    out.push_str("# no native CMake support for Objective-C flags\n");
    let _ = writeln!(out, "set_target_properties({} PROPERTIES", object_name);
    out.push_str("    COMPILE_FLAGS \"${CMAKE_OBJC_FLAGS}\"\n)\n\n");
}

impl SourceDirDescriptor {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}\n", BANNER);
        let _ = writeln!(
            out,
            "cmake_minimum_required(VERSION {})\n",
            self.cmake_minimum_version
        );
        let _ = writeln!(
            out,
            "include_directories({})\n",
            quoted(&self.source_directory)
        );

        for (lang, files) in &self.files {
            block(
                &mut out,
                &format!("set({}", files_var(*lang)),
                files.iter().map(|f| quoted(f)),
            );
        }
        if !self.resource_files.is_empty() {
            block(
                &mut out,
                &format!("set({}", RESOURCE_VAR),
                self.resource_files.iter().map(|f| quoted(f)),
            );
        }

        let command = match self.kind {
            ArtifactKind::Library => "add_library",
            ArtifactKind::Executable => "add_executable",
        };
        let mut items: Vec<String> = self
            .files
            .keys()
            .map(|lang| format!("${{{}}}", files_var(*lang)))
            .collect();
        if !self.resource_files.is_empty() {
            items.push(format!("${{{}}}", RESOURCE_VAR));
        }
        block(&mut out, &format!("{}({}", command, self.object_name), items);

        if !self.resource_files.is_empty() {
            let _ = writeln!(out, "set_target_properties({}", self.object_name);
            out.push_str("    PROPERTIES\n");
            let _ = writeln!(out, "    RESOURCE \"${{{}}}\"\n)\n", RESOURCE_VAR);
        }

        if self.has_language(SourceLanguage::Objc) {
            objc_compile_flags(&mut out, &self.object_name);
        }

        for plist in self.plist_files() {
            let _ = writeln!(out, "set_target_properties({} PROPERTIES", self.object_name);
            let _ = writeln!(out, "    MACOSX_BUNDLE_INFO_PLIST {}\n)\n", quoted(plist));
        }

        link_libraries(&mut out, &self.object_name, &self.link_dependencies);
        out
    }
}

impl TestDirDescriptor {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}\n", BANNER);
        out.push_str("enable_testing()\n\n");
        let _ = writeln!(
            out,
            "include_directories({})\n",
            quoted(&self.source_directory)
        );

        for test in &self.tests {
            block(
                &mut out,
                &format!("add_executable({}", test.name),
                test.sources.iter().map(|f| quoted(f)),
            );
            if test.languages.contains(&SourceLanguage::Objc) {
                objc_compile_flags(&mut out, &test.name);
            }
            link_libraries(&mut out, &test.name, &self.link_dependencies);
            let _ = writeln!(out, "add_test({} {})\n", test.name, test.name);
        }
        out
    }
}

impl DummyLibDescriptor {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}\n", BANNER);
        let _ = writeln!(out, "add_library({} {})\n", self.lib_name, DUMMY_C_FILE);
        link_libraries(&mut out, &self.lib_name, &self.link_dependencies);
        out
    }
}

impl ComponentDescriptor {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}\n", BANNER);

        if let Some(bootstrap) = &self.bootstrap {
            let _ = writeln!(
                out,
                "cmake_minimum_required(VERSION {})\n",
                bootstrap.cmake_minimum_version
            );
            out.push_str("# prefer CMAKE_MODULE_PATH modules over those in system directories\n");
            out.push_str("cmake_policy(SET CMP0017 OLD)\n\n");
            let _ = writeln!(out, "# toolchain file for {}", bootstrap.target_name);
            let _ = writeln!(
                out,
                "set(CMAKE_TOOLCHAIN_FILE {})\n",
                quoted(&bootstrap.toolchain_file)
            );
            for like in &bootstrap.targets_like {
                let _ = writeln!(out, "set(TARGET_LIKE_{} TRUE)", like);
            }
            out.push('\n');
        }

        let _ = writeln!(out, "project({})\n", self.component_name);

        out.push_str("# root directories of this component and everything it depends on\n");
        include_lines(&mut out, "", &self.includes.root);
        out.push('\n');

        if !self.dependency_subdirs.is_empty() {
            out.push_str("# dependencies not already built elsewhere in this tree\n");
            for dir in &self.dependency_subdirs {
                let _ = writeln!(out, "add_subdirectory({})", quoted(dir));
            }
            out.push('\n');
        }

        if !self.includes.system.is_empty() {
            out.push_str("# header directories exported as system headers\n");
            include_lines(&mut out, "SYSTEM ", &self.includes.system);
            out.push('\n');
        }

        if !self.includes.other.is_empty() {
            out.push_str("# extra (non-system) header directories\n");
            include_lines(&mut out, "", &self.includes.other);
            out.push('\n');
        }

        if !self.objc_flags.is_empty() {
            let _ = writeln!(out, "set(CMAKE_OBJC_FLAGS \"{}\")\n", self.objc_flags);
        }

        out.push_str("# definitions for the active target and every target it is like\n");
        let _ = writeln!(out, "add_definitions({})\n", self.definitions.join(" "));

        let _ = writeln!(
            out,
            "set(YOTTA_COMPONENT_VERSION \"{}\")\n",
            self.component_version
        );

        if !self.own_subdirs.is_empty() {
            out.push_str("# subdirectories of this component\n");
            for subdir in &self.own_subdirs {
                out.push_str("add_subdirectory(\n");
                let _ = writeln!(out, "    {}", quoted(&subdir.source));
                let _ = writeln!(out, "    {}", quoted(&subdir.binary));
                out.push_str(")\n");
            }
            out.push('\n');
        }
        out
    }
}

fn include_lines(out: &mut String, kind: &str, dirs: &[PathBuf]) {
    for dir in dirs {
        let _ = writeln!(out, "include_directories({}{})", kind, quoted(dir));
    }
}
