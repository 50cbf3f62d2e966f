//! Python project checks (`pyproject.toml`, Ruff, mypy, uv).

use std::path::Path;

use super::base::{
    check_file_exists, child_dirs, expect, load_toml, parse_toml, read_bytes, read_optional,
    toml_array_contains, toml_table, toml_truthy,
};
use super::common::CI_WORKFLOW;
use super::{CheckFn, Registry};
use crate::language::Language;
use crate::types::{Status, VerificationReport};

const PYPROJECT: &str = "pyproject.toml";

pub(super) fn register(registry: &mut Registry) {
    let checks: &[CheckFn] = &[
        check_pyproject_toml,
        check_src_layout,
        check_uv_lock,
        check_dependency_groups,
        check_ruff,
        check_ruff_lint,
        check_mypy,
        check_precommit_hooks,
        check_devbox,
        check_ci,
    ];
    let mut python = registry.register_language(Language::Python);
    for check in checks {
        python.register(*check);
    }
}

// -----------------------------------------------------------------------------
// Project configuration
// -----------------------------------------------------------------------------

fn check_pyproject_toml(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let pyproject_path = path.join(PYPROJECT);
    let (status, message) = check_file_exists(&pyproject_path, Status::Fail, None);
    report.add("pyproject.toml exists", status, message);
    if status != Status::Pass {
        return Ok(());
    }

    let config = match parse_toml(read_bytes(&pyproject_path)?) {
        Ok(config) => {
            report.pass("pyproject.toml valid TOML");
            config
        }
        Err(e) => {
            report.add("pyproject.toml valid TOML", Status::Fail, e.to_string());
            return Ok(());
        }
    };

    expect(
        report,
        "pyproject.toml has [project] section",
        toml_truthy(config.get("project")),
        Status::Fail,
        "Missing [project] section",
    );
    Ok(())
}

// -----------------------------------------------------------------------------
// Project layout
// -----------------------------------------------------------------------------

fn check_src_layout(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let src_path = path.join("src");
    if !src_path.is_dir() {
        report.add(
            "src/ directory exists",
            Status::Warn,
            "Consider using a src/ layout for source code",
        );
        return Ok(());
    }
    report.pass("src/ directory exists");

    let has_packages = child_dirs(&src_path)?
        .iter()
        .any(|dir| dir.join("__init__.py").exists());
    expect(
        report,
        "src/ contains packages",
        has_packages,
        Status::Warn,
        "No packages found in src/ directory",
    );
    Ok(())
}

// -----------------------------------------------------------------------------
// Dependency management
// -----------------------------------------------------------------------------

fn check_uv_lock(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    expect(
        report,
        "uv.lock file exists",
        path.join("uv.lock").exists(),
        Status::Warn,
        "Consider adding uv.lock for dependency locking",
    );
    Ok(())
}

fn check_dependency_groups(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(config) = load_toml(&path.join(PYPROJECT))? else {
        return Ok(());
    };

    let Some(groups) = config
        .get("dependency-groups")
        .and_then(toml::Value::as_table)
        .filter(|t| !t.is_empty())
    else {
        report.add(
            "Has dependency-groups",
            Status::Warn,
            "Consider using dependency-groups for dev dependencies",
        );
        return Ok(());
    };
    report.pass("Has dependency-groups");

    expect(
        report,
        "Has dev dependency group",
        groups.contains_key("dev"),
        Status::Warn,
        "Consider adding a 'dev' dependency group",
    );
    Ok(())
}

// -----------------------------------------------------------------------------
// Linting and formatting
// -----------------------------------------------------------------------------

fn check_ruff(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(config) = load_toml(&path.join(PYPROJECT))? else {
        return Ok(());
    };

    let Some(ruff) = toml_table(&config, &["tool", "ruff"]).filter(|t| !t.is_empty()) else {
        report.add(
            "Ruff is configured",
            Status::Fail,
            "Ruff is not configured in pyproject.toml",
        );
        return Ok(());
    };
    report.pass("Ruff is configured");

    expect(
        report,
        "Ruff has line-length configured",
        ruff.contains_key("line-length"),
        Status::Warn,
        "Consider setting line-length",
    );

    match toml_table(ruff, &["format"]).filter(|t| !t.is_empty()) {
        Some(format) => {
            report.pass("Ruff format is configured");
            expect(
                report,
                "Ruff format uses LF line endings",
                format.get("line-ending").and_then(toml::Value::as_str) == Some("lf"),
                Status::Warn,
                "Consider setting line-ending = 'lf'",
            );
        }
        None => report.add(
            "Ruff format is configured",
            Status::Warn,
            "Consider configuring [tool.ruff.format]",
        ),
    }
    Ok(())
}

fn check_ruff_lint(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(config) = load_toml(&path.join(PYPROJECT))? else {
        return Ok(());
    };

    let Some(lint) = toml_table(&config, &["tool", "ruff", "lint"]).filter(|t| !t.is_empty())
    else {
        report.add(
            "Ruff lint is configured",
            Status::Warn,
            "Consider configuring [tool.ruff.lint]",
        );
        return Ok(());
    };
    report.pass("Ruff lint is configured");

    expect(
        report,
        "Ruff lint preview mode enabled",
        toml_truthy(lint.get("preview")),
        Status::Warn,
        "Consider enabling preview mode for latest rules",
    );

    if !toml_truthy(lint.get("select")) {
        report.add(
            "Ruff lint has rules selected",
            Status::Warn,
            "No lint rules selected",
        );
        return Ok(());
    }
    report.pass("Ruff lint has rules selected");

    let selects_all = toml_array_contains(lint.get("select"), "ALL");
    expect(
        report,
        "Ruff lint uses ALL rule",
        selects_all,
        Status::Warn,
        "Consider enabling the ALL rule",
    );

    // An ignore list only matters once everything is selected.
    if selects_all {
        expect(
            report,
            "Ruff lint has ignore list",
            toml_truthy(lint.get("ignore")),
            Status::Warn,
            "Consider adding ignore list for rules that conflict",
        );
    }

    expect(
        report,
        "Ruff pydocstyle convention set",
        toml_table(lint, &["pydocstyle"]).is_some_and(|t| toml_truthy(t.get("convention"))),
        Status::Warn,
        "Consider setting pydocstyle convention (e.g., 'google')",
    );

    expect(
        report,
        "Ruff isort is configured",
        toml_table(lint, &["isort"]).is_some_and(|t| !t.is_empty()),
        Status::Warn,
        "Consider configuring isort settings",
    );

    let copyright = toml_table(lint, &["flake8-copyright"])
        .is_some_and(|t| toml_truthy(t.get("notice-rgx")));
    expect(
        report,
        "Ruff copyright notice configured",
        copyright,
        Status::Warn,
        "Consider configuring copyright notice regex",
    );
    Ok(())
}

// -----------------------------------------------------------------------------
// Type checking
// -----------------------------------------------------------------------------

fn check_mypy(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(config) = load_toml(&path.join(PYPROJECT))? else {
        return Ok(());
    };

    let Some(mypy) = toml_table(&config, &["tool", "mypy"]).filter(|t| !t.is_empty()) else {
        report.add(
            "mypy is configured",
            Status::Fail,
            "mypy is not configured in pyproject.toml",
        );
        return Ok(());
    };
    report.pass("mypy is configured");

    expect(
        report,
        "mypy strict mode enabled",
        toml_truthy(mypy.get("strict")),
        Status::Warn,
        "Consider enabling strict mode",
    );
    Ok(())
}

// -----------------------------------------------------------------------------
// Tooling integration
// -----------------------------------------------------------------------------

fn check_precommit_hooks(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join(".pre-commit-config.yaml"))? else {
        return Ok(());
    };

    if content.contains("ruff") {
        report.pass("Pre-commit has Ruff hooks");
        expect(
            report,
            "Pre-commit has ruff-check",
            content.contains("ruff-check"),
            Status::Warn,
            "Consider adding ruff-check hook",
        );
        expect(
            report,
            "Pre-commit has ruff-format",
            content.contains("ruff-format"),
            Status::Warn,
            "Consider adding ruff-format hook",
        );
    } else {
        report.add(
            "Pre-commit has Ruff hooks",
            Status::Warn,
            "Consider adding Ruff pre-commit hooks",
        );
    }

    expect(
        report,
        "Pre-commit has mypy hook",
        content.contains("mypy"),
        Status::Warn,
        "Consider adding mypy pre-commit hook",
    );
    Ok(())
}

fn check_devbox(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join("devbox.json"))? else {
        return Ok(());
    };

    expect(
        report,
        "Devbox includes uv",
        content.contains("uv@") || content.contains("\"uv\""),
        Status::Warn,
        "Consider adding uv to Devbox packages",
    );
    Ok(())
}

fn check_ci(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join(CI_WORKFLOW))? else {
        return Ok(());
    };
    let content = content.to_lowercase();

    let steps = [
        ("CI checks formatting", "ruff format", "Consider adding format check to CI"),
        ("CI runs linting", "ruff check", "Consider adding lint check to CI"),
        ("CI runs type checking", "mypy", "Consider adding type check to CI"),
    ];
    for (name, needle, message) in steps {
        expect(report, name, content.contains(needle), Status::Warn, message);
    }
    Ok(())
}
