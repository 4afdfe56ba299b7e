//! `cmakegen generate` command

use anyhow::Result;

use crate::cli::{GenerateArgs, MessageFormat};
use cmakegen::builder::GenerateEvent;
use cmakegen::ops::cmakegen_generate::{generate, GenerateOptions};
use cmakegen::util::config::global_config_path;
use cmakegen::util::diagnostic::emit;
use cmakegen::util::fs::relative_path;

pub fn execute(args: GenerateArgs, color: bool) -> Result<bool> {
    let opts = GenerateOptions {
        path: args.path,
        target_dir: args.target,
        build_dir: args.build_dir,
        global_config: global_config_path(),
    };

    let output = generate(&opts)?;
    let report = &output.report;

    match args.message_format {
        MessageFormat::Json => {
            for event in GenerateEvent::from_report(report) {
                println!("{}", event.to_json());
            }
        }
        MessageFormat::Human => {
            // Warnings were already logged as they were found.
            for error in &report.errors {
                emit(&error.to_diagnostic(), color);
            }

            for file in report.modified() {
                tracing::debug!(
                    "{:?} {}",
                    file.outcome,
                    relative_path(&output.build_dir, &file.path).display()
                );
            }

            let modified = report.modified().count();
            eprintln!(
                "    Generated {} ({} file(s) checked, {} updated)",
                output.build_dir.display(),
                report.written.len(),
                modified
            );
            if !report.is_success() {
                eprintln!(
                    "error: generation finished with {} error(s)",
                    report.errors.len()
                );
            }
        }
    }

    Ok(report.is_success())
}
