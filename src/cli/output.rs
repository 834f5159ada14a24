//! CLI output: rendering of plans, reports and errors for the terminal.

use crate::error::ConfigurationError;
use crate::sync::{Diff, SyncReport};
use std::fmt::Write;

/// Map configuration errors to a single message block
pub fn map_config_errors(errors: &[ConfigurationError]) -> String {
    let mut out = String::from("Invalid invocation:");
    for error in errors {
        let _ = write!(out, "\n  - {}", error);
    }
    out
}

/// Render the operations a sync would apply, in apply order
pub fn format_plan(diff: &Diff) -> String {
    if diff.is_empty() {
        return "Replica is up to date".to_string();
    }

    let mut out = String::new();
    for entry in &diff.deleted {
        let _ = writeln!(out, "delete  {}", entry.relative_path().display());
    }
    for modification in &diff.modified {
        let _ = writeln!(out, "modify  {}", modification.replica.relative_path.display());
    }
    for entry in &diff.created {
        let _ = writeln!(out, "create  {}", entry.relative_path().display());
    }
    let summary = diff.summary();
    let _ = write!(
        out,
        "{} to delete, {} to modify, {} to create",
        summary.deleted, summary.modified, summary.created
    );
    out
}

/// One-line summary of a finished sync
pub fn format_report(report: &SyncReport) -> String {
    if report.is_noop() {
        return "Replica is up to date".to_string();
    }
    let mut out = format!(
        "Deleted {}, modified {}, created {}",
        report.deleted, report.modified, report.created
    );
    if report.has_errors() {
        let _ = write!(out, "; {} operation(s) failed:", report.errors.len());
        for error in &report.errors {
            let _ = write!(out, "\n  - {}", error);
        }
    }
    out
}
