//! Checks that apply to every project regardless of language.

use std::path::Path;

use super::base::{check_file_exists, expect, json_truthy, parse_json, read_bytes, read_text};
use super::{CheckFn, Registry};
use crate::types::{Status, VerificationReport};

/// Path of the CI workflow every project is expected to carry.
pub(super) const CI_WORKFLOW: &str = ".github/workflows/ci.yaml";

/// Files that are required but have no further content checks.
const REQUIRED_FILES: &[(&str, &str)] = &[
    (".gitattributes", "Git attributes"),
    (".gitignore", "Git ignore"),
    ("LICENSE", "License file"),
    ("README.md", "README"),
];

pub(super) fn register(registry: &mut Registry) {
    let checks: &[CheckFn] = &[
        check_required_files,
        check_devbox,
        check_pre_commit,
        check_renovate,
        check_github_actions,
        check_editorconfig,
    ];
    for check in checks {
        registry.register_common(*check);
    }
}

fn check_required_files(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    for (filename, description) in REQUIRED_FILES {
        let (status, message) = check_file_exists(&path.join(filename), Status::Fail, None);
        report.add(*description, status, message);
    }
    Ok(())
}

fn check_devbox(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let devbox_path = path.join("devbox.json");
    if !devbox_path.exists() {
        report.add("Devbox configuration", Status::Fail, "Missing devbox.json");
        return Ok(());
    }
    report.pass("Devbox configuration");

    match parse_json(read_bytes(&devbox_path)?) {
        Ok(config) => expect(
            report,
            "Devbox has packages",
            json_truthy(config.get("packages")),
            Status::Warn,
            "No packages defined",
        ),
        Err(_) => report.add("Devbox valid JSON", Status::Fail, "Invalid JSON"),
    }
    Ok(())
}

fn check_pre_commit(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    expect(
        report,
        "Pre-commit configuration",
        path.join(".pre-commit-config.yaml").exists(),
        Status::Fail,
        "Missing .pre-commit-config.yaml",
    );
    Ok(())
}

fn check_renovate(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    expect(
        report,
        "Renovate configuration",
        path.join("renovate.json").exists(),
        Status::Warn,
        "Missing renovate.json",
    );
    Ok(())
}

fn check_github_actions(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    expect(
        report,
        "GitHub Actions CI workflow",
        path.join(CI_WORKFLOW).exists(),
        Status::Fail,
        &format!("Missing {}", CI_WORKFLOW),
    );
    Ok(())
}

fn check_editorconfig(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let editorconfig_path = path.join(".editorconfig");
    let (status, message) = check_file_exists(&editorconfig_path, Status::Fail, None);
    report.add("EditorConfig configuration", status, message);
    if status != Status::Pass {
        return Ok(());
    }

    let content = read_text(&editorconfig_path)?;
    let settings = [
        ("EditorConfig has root=true", "root = true"),
        ("EditorConfig line endings", "end_of_line = lf"),
        ("EditorConfig charset", "charset = utf-8"),
    ];
    for (name, setting) in settings {
        expect(
            report,
            name,
            content.contains(setting),
            Status::Warn,
            &format!("Missing {}", setting),
        );
    }
    Ok(())
}
