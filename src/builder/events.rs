//! Generation event types for JSON output.
//!
//! This module defines the JSON schema for machine-readable generation output.
//! These events are emitted when using `--message-format=json`.
//!
//! # Event Types
//!
//! - `file-generated`: A build file was written or found up to date
//! - `diagnostic`: An error or warning was recorded
//! - `generate-finished`: Generation completed (success or failure)
//!
//! # Stability
//!
//! New fields may be added, but existing fields should not be removed or renamed.

use std::path::PathBuf;

use serde::Serialize;

use crate::builder::cmakegen::{GenerateReport, WrittenFile};
use crate::builder::errors::{GenerateError, GenerateWarning};
use crate::util::diagnostic::Severity;
use crate::util::fs::WriteOutcome;

/// An event emitted for one generation run.
///
/// Each event is serialized as a single JSON object per line.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum GenerateEvent {
    /// A build file was checked and, if needed, written.
    #[serde(rename = "file-generated")]
    FileGenerated {
        path: PathBuf,
        outcome: WriteOutcome,
    },

    /// A recorded error or warning.
    #[serde(rename = "diagnostic")]
    Diagnostic {
        level: Severity,
        /// Stable diagnostic code, e.g. `cmakegen::generate::missing_dependency`
        code: String,
        message: String,
    },

    /// Generation completed.
    #[serde(rename = "generate-finished")]
    GenerateFinished {
        success: bool,
        /// Number of files checked or written
        files: usize,
        /// Number of files whose contents changed
        modified: usize,
        errors: usize,
        warnings: usize,
    },
}

impl GenerateEvent {
    pub fn file(written: &WrittenFile) -> Self {
        GenerateEvent::FileGenerated {
            path: written.path.clone(),
            outcome: written.outcome,
        }
    }

    pub fn error(error: &GenerateError) -> Self {
        GenerateEvent::Diagnostic {
            level: Severity::Error,
            code: diagnostic_code(error),
            message: error.to_string(),
        }
    }

    pub fn warning(warning: &GenerateWarning) -> Self {
        GenerateEvent::Diagnostic {
            level: Severity::Warning,
            code: diagnostic_code(warning),
            message: warning.to_string(),
        }
    }

    pub fn finished(report: &GenerateReport) -> Self {
        GenerateEvent::GenerateFinished {
            success: report.is_success(),
            files: report.written.len(),
            modified: report.modified().count(),
            errors: report.errors.len(),
            warnings: report.warnings.len(),
        }
    }

    /// All events for a report, in emission order: files, then errors,
    /// then warnings, then the summary.
    pub fn from_report(report: &GenerateReport) -> Vec<GenerateEvent> {
        report
            .written
            .iter()
            .map(GenerateEvent::file)
            .chain(report.errors.iter().map(GenerateEvent::error))
            .chain(report.warnings.iter().map(GenerateEvent::warning))
            .chain(std::iter::once(GenerateEvent::finished(report)))
            .collect()
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn diagnostic_code(diagnostic: &dyn miette::Diagnostic) -> String {
    diagnostic
        .code()
        .map(|code| code.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_generated_serialization() {
        let event = GenerateEvent::file(&WrittenFile {
            path: PathBuf::from("build/CMakeLists.txt"),
            outcome: WriteOutcome::Created,
        });
        let json = event.to_json();
        assert!(json.contains("\"reason\":\"file-generated\""));
        assert!(json.contains("\"outcome\":\"created\""));
        assert!(json.contains("CMakeLists.txt"));
    }

    #[test]
    fn test_diagnostic_carries_code() {
        let event = GenerateEvent::error(&GenerateError::MissingDependency {
            component: "app".into(),
            dependency: "gone".into(),
        });
        let json = event.to_json();
        assert!(json.contains("\"reason\":\"diagnostic\""));
        assert!(json.contains("\"level\":\"error\""));
        assert!(json.contains("cmakegen::generate::missing_dependency"));
    }

    #[test]
    fn test_report_events_end_with_summary() {
        let mut report = GenerateReport::default();
        report.written.push(WrittenFile {
            path: PathBuf::from("a"),
            outcome: WriteOutcome::Unchanged,
        });
        report.warnings.push(GenerateWarning::NonStandardDirectory {
            component: "app".into(),
            dirname: "src".into(),
            message: "bad name".into(),
        });

        let events = GenerateEvent::from_report(&report);
        assert_eq!(events.len(), 3);
        let last = events.last().unwrap().to_json();
        assert!(last.contains("\"reason\":\"generate-finished\""));
        assert!(last.contains("\"success\":true"));
        assert!(last.contains("\"modified\":0"));
        assert!(last.contains("\"warnings\":1"));
    }
}
