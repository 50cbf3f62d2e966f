//! Core types for verification results.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::language::Language;

/// Message recorded for results listed in the project's skip list.
pub const SKIPPED_BY_CONFIG: &str = "Skipped by configuration";

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    Warn,
    Skip,
}

impl Status {
    /// Statuses in the order they are grouped for display.
    pub const DISPLAY_ORDER: [Status; 4] = [Status::Fail, Status::Warn, Status::Pass, Status::Skip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Warn => "WARN",
            Status::Skip => "SKIP",
        }
    }

    /// Heading used when results are grouped by status.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pass => "Passed",
            Status::Fail => "Failed",
            Status::Warn => "Warnings",
            Status::Skip => "Skipped",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single named check outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub status: Status,
    /// Empty when the status speaks for itself.
    pub message: String,
}

/// Ordered log of check outcomes for one audited project.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    project_path: PathBuf,
    languages: BTreeSet<Language>,
    results: Vec<CheckResult>,
    skip: HashSet<String>,
}

impl VerificationReport {
    pub fn new<P: AsRef<Path>>(project_path: P, languages: BTreeSet<Language>) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
            languages,
            results: Vec::new(),
            skip: HashSet::new(),
        }
    }

    /// Record results with any of these names as SKIP regardless of what the check reports.
    pub fn with_skips<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append a check result.
    pub fn add(&mut self, name: impl Into<String>, status: Status, message: impl Into<String>) {
        let name = name.into();
        let (status, message) = if self.skip.contains(&name) {
            (Status::Skip, SKIPPED_BY_CONFIG.to_string())
        } else {
            (status, message.into())
        };
        self.results.push(CheckResult {
            name,
            status,
            message,
        });
    }

    /// Append a PASS result with no message.
    pub fn pass(&mut self, name: impl Into<String>) {
        self.add(name, Status::Pass, "");
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn languages(&self) -> &BTreeSet<Language> {
        &self.languages
    }

    /// Results in evaluation order.
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Results with the given status, in evaluation order.
    pub fn with_status(&self, status: Status) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(move |r| r.status == status)
    }

    fn count(&self, status: Status) -> usize {
        self.with_status(status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(Status::Pass)
    }

    pub fn failed(&self) -> usize {
        self.count(Status::Fail)
    }

    pub fn warnings(&self) -> usize {
        self.count(Status::Warn)
    }

    pub fn skipped(&self) -> usize {
        self.count(Status::Skip)
    }

    /// Whether any hard requirement is unmet.
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> VerificationReport {
        VerificationReport::new("/tmp/project", BTreeSet::new())
    }

    #[test]
    fn test_counts_match_results() {
        let mut r = report();
        r.pass("a");
        r.add("b", Status::Fail, "missing");
        r.add("c", Status::Warn, "consider");
        r.add("d", Status::Warn, "consider");
        r.add("e", Status::Skip, "");

        assert_eq!(r.passed(), 1);
        assert_eq!(r.failed(), 1);
        assert_eq!(r.warnings(), 2);
        assert_eq!(r.skipped(), 1);
        assert!(r.passed() + r.failed() + r.warnings() < r.results().len());
        assert!(r.has_failures());
    }

    #[test]
    fn test_counts_equal_len_without_skips() {
        let mut r = report();
        r.pass("a");
        r.add("b", Status::Warn, "x");
        assert_eq!(r.passed() + r.failed() + r.warnings(), r.results().len());
        assert!(!r.has_failures());
    }

    #[test]
    fn test_insertion_order_and_duplicates_kept() {
        let mut r = report();
        r.add("same", Status::Fail, "first");
        r.pass("other");
        r.add("same", Status::Warn, "second");

        let names: Vec<_> = r.results().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["same", "other", "same"]);
        assert_eq!(r.results()[2].message, "second");
    }

    #[test]
    fn test_skip_list_overrides_status() {
        let mut r = report().with_skips(["Renovate configuration"]);
        r.add("Renovate configuration", Status::Warn, "Missing renovate.json");
        r.add("README", Status::Fail, "Missing README.md");

        assert_eq!(r.results()[0].status, Status::Skip);
        assert_eq!(r.results()[0].message, SKIPPED_BY_CONFIG);
        assert_eq!(r.results()[1].status, Status::Fail);
        assert_eq!(r.skipped(), 1);
        assert_eq!(r.warnings(), 0);
    }

    #[test]
    fn test_status_display_and_serde() {
        assert_eq!(Status::Warn.to_string(), "WARN");
        assert_eq!(Status::Skip.label(), "Skipped");
        assert_eq!(serde_json::to_string(&Status::Pass).unwrap(), "\"pass\"");
    }
}
