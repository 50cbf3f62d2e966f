//! Output formatting for verification reports.
//!
//! Supports two output formats:
//! - Pretty: results grouped by status for terminals
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

use crate::types::{Status, VerificationReport};

const RULE_WIDTH: usize = 60;

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub path: String,
    pub languages: Vec<String>,
    pub summary: JsonSummary,
    pub results: Vec<JsonResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSummary {
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonResult {
    pub name: String,
    pub status: Status,
    pub message: String,
}

/// Build the machine-readable form of a report.
pub fn to_json_report(report: &VerificationReport) -> JsonReport {
    JsonReport {
        path: display_path(report.project_path()),
        languages: report
            .languages()
            .iter()
            .map(|l| l.as_str().to_string())
            .collect(),
        summary: JsonSummary {
            passed: report.passed(),
            failed: report.failed(),
            warnings: report.warnings(),
        },
        results: report
            .results()
            .iter()
            .map(|r| JsonResult {
                name: r.name.clone(),
                status: r.status,
                message: r.message.clone(),
            })
            .collect(),
    }
}

/// Write the report as pretty-printed JSON to stdout.
pub fn write_json(report: &VerificationReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&to_json_report(report))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Render the report grouped by status: failures first, then warnings, passes, skips.
pub fn render_pretty(report: &VerificationReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let languages = report
        .languages()
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", "Project Standards Verification Report".bold());
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Path: {}", display_path(report.project_path()));
    let _ = writeln!(
        out,
        "Languages: {}",
        if languages.is_empty() { "None" } else { languages.as_str() }
    );
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);

    for status in Status::DISPLAY_ORDER {
        let mut items = report.with_status(status).peekable();
        if items.peek().is_none() {
            continue;
        }

        let _ = writeln!(out, "{}:", status.label().bold());
        for item in items {
            let _ = write!(out, "  {} {}", colored_tag(status), item.name);
            if !item.message.is_empty() {
                let _ = write!(out, " - {}", item.message);
            }
            let _ = writeln!(out);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Summary: {} passed, {} failed, {} warnings",
        report.passed(),
        report.failed(),
        report.warnings()
    );
    let _ = writeln!(out, "{}", rule);
    out
}

/// Write the report in pretty (human-readable) format to stdout.
pub fn write_pretty(report: &VerificationReport) {
    print!("{}", render_pretty(report));
}

fn colored_tag(status: Status) -> ColoredString {
    let tag = format!("[{}]", status);
    match status {
        Status::Pass => tag.green(),
        Status::Fail => tag.red(),
        Status::Warn => tag.yellow(),
        Status::Skip => tag.dimmed(),
    }
}

/// Absolute form of the audited path when it can be resolved.
fn display_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use std::collections::BTreeSet;

    fn sample() -> VerificationReport {
        let mut report = VerificationReport::new(
            "/nonexistent/project",
            BTreeSet::from([Language::Rust, Language::Python]),
        );
        report.pass("README");
        report.add("License file", Status::Fail, "Missing LICENSE");
        report.add("Renovate configuration", Status::Warn, "Missing renovate.json");
        report.add("Devbox", Status::Skip, "");
        report.add("Git ignore", Status::Fail, "Missing .gitignore");
        report
    }

    #[test]
    fn test_pretty_groups_in_status_order() {
        colored::control::set_override(false);
        let out = render_pretty(&sample());

        let failed = out.find("Failed:").unwrap();
        let warnings = out.find("Warnings:").unwrap();
        let passed = out.find("Passed:").unwrap();
        let skipped = out.find("Skipped:").unwrap();
        assert!(failed < warnings && warnings < passed && passed < skipped);

        assert!(out.contains("  [FAIL] License file - Missing LICENSE\n"));
        assert!(out.contains("  [PASS] README\n"));
        assert!(out.contains("  [SKIP] Devbox\n"));
        assert!(out.contains("Languages: python, rust\n"));
        assert!(out.contains("Path: /nonexistent/project\n"));
        assert!(out.contains("Summary: 1 passed, 2 failed, 1 warnings\n"));

        // Evaluation order is kept inside a group.
        let license = out.find("License file").unwrap();
        let gitignore = out.find("Git ignore").unwrap();
        assert!(license < gitignore);
    }

    #[test]
    fn test_pretty_omits_empty_groups() {
        colored::control::set_override(false);
        let mut report = VerificationReport::new("/nonexistent", BTreeSet::new());
        report.pass("README");

        let out = render_pretty(&report);
        assert!(out.contains("Languages: None\n"));
        assert!(!out.contains("Failed:"));
        assert!(!out.contains("Skipped:"));
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(to_json_report(&sample())).unwrap();

        assert_eq!(value["path"], "/nonexistent/project");
        assert_eq!(value["languages"], serde_json::json!(["python", "rust"]));
        assert_eq!(
            value["summary"],
            serde_json::json!({"passed": 1, "failed": 2, "warnings": 1})
        );
        assert_eq!(value["results"].as_array().unwrap().len(), 5);
        assert_eq!(
            value["results"][1],
            serde_json::json!({
                "name": "License file",
                "status": "fail",
                "message": "Missing LICENSE"
            })
        );
        assert_eq!(value["results"][0]["message"], "");
    }
}
