//! Rust project checks (`Cargo.toml`, rustfmt, Clippy).

use std::path::Path;

use super::base::{
    check_file_exists, expect, first_existing, load_toml, parse_toml, read_bytes, read_optional,
    toml_table,
};
use super::common::CI_WORKFLOW;
use super::{CheckFn, Registry};
use crate::language::Language;
use crate::types::{Status, VerificationReport};

const MANIFEST: &str = "Cargo.toml";
const RUSTFMT_CONFIGS: &[&str] = &["rustfmt.toml", ".rustfmt.toml"];
const TOOLCHAIN_FILES: &[&str] = &["rust-toolchain.toml", "rust-toolchain"];
const FMT_HOOKS: &[&str] = &["cargo fmt", "cargo-fmt", "rustfmt", "id: fmt"];

pub(super) fn register(registry: &mut Registry) {
    let checks: &[CheckFn] = &[
        check_cargo_toml,
        check_cargo_lock,
        check_rustfmt,
        check_toolchain,
        check_clippy_lints,
        check_unsafe_code,
        check_precommit_hooks,
        check_devbox,
        check_ci,
    ];
    let mut rust = registry.register_language(Language::Rust);
    for check in checks {
        rust.register(*check);
    }
}

/// Lint table for `kind` ("clippy", "rust"), from `[lints]` or `[workspace.lints]`.
fn lints_table<'a>(manifest: &'a toml::Table, kind: &str) -> Option<&'a toml::Table> {
    toml_table(manifest, &["lints", kind])
        .filter(|t| !t.is_empty())
        .or_else(|| {
            toml_table(manifest, &["workspace", "lints", kind]).filter(|t| !t.is_empty())
        })
}

/// Lint level string, accepting both `x = "warn"` and `x = { level = "warn" }`.
fn lint_level<'a>(table: &'a toml::Table, lint: &str) -> Option<&'a str> {
    match table.get(lint)? {
        toml::Value::String(level) => Some(level.as_str()),
        toml::Value::Table(t) => t.get("level").and_then(toml::Value::as_str),
        _ => None,
    }
}

fn check_cargo_toml(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let manifest_path = path.join(MANIFEST);
    let (status, message) = check_file_exists(&manifest_path, Status::Fail, None);
    report.add("Cargo.toml exists", status, message);
    if status != Status::Pass {
        return Ok(());
    }

    let manifest = match parse_toml(read_bytes(&manifest_path)?) {
        Ok(manifest) => {
            report.pass("Cargo.toml valid TOML");
            manifest
        }
        Err(e) => {
            report.add("Cargo.toml valid TOML", Status::Fail, e.to_string());
            return Ok(());
        }
    };

    let package = toml_table(&manifest, &["package"]);
    let workspace = toml_table(&manifest, &["workspace"]);
    if package.is_none() && workspace.is_none() {
        report.add(
            "Cargo.toml has [package] or [workspace]",
            Status::Fail,
            "Missing [package] or [workspace] section",
        );
        return Ok(());
    }
    report.pass("Cargo.toml has [package] or [workspace]");

    let edition = package.and_then(|p| p.get("edition")).or_else(|| {
        toml_table(&manifest, &["workspace", "package"]).and_then(|p| p.get("edition"))
    });
    expect(
        report,
        "Cargo.toml sets edition",
        edition.is_some(),
        Status::Warn,
        "Consider setting an explicit edition",
    );
    Ok(())
}

fn check_cargo_lock(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    expect(
        report,
        "Cargo.lock file exists",
        path.join("Cargo.lock").exists(),
        Status::Warn,
        "Consider committing Cargo.lock for dependency locking",
    );
    Ok(())
}

fn check_rustfmt(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    expect(
        report,
        "rustfmt is configured",
        first_existing(path, RUSTFMT_CONFIGS).is_some(),
        Status::Warn,
        "Consider adding rustfmt.toml",
    );
    Ok(())
}

fn check_toolchain(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    expect(
        report,
        "Rust toolchain pinned",
        first_existing(path, TOOLCHAIN_FILES).is_some(),
        Status::Warn,
        "Consider adding rust-toolchain.toml",
    );
    Ok(())
}

fn check_clippy_lints(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(manifest) = load_toml(&path.join(MANIFEST))? else {
        return Ok(());
    };

    let Some(clippy) = lints_table(&manifest, "clippy") else {
        report.add(
            "Clippy lints configured",
            Status::Fail,
            "Clippy lints are not configured in Cargo.toml",
        );
        return Ok(());
    };
    report.pass("Clippy lints configured");

    let pedantic = matches!(lint_level(clippy, "pedantic"), Some("warn" | "deny" | "forbid"));
    expect(
        report,
        "Clippy pedantic lints enabled",
        pedantic,
        Status::Warn,
        "Consider enabling the pedantic lint group",
    );
    Ok(())
}

fn check_unsafe_code(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(manifest) = load_toml(&path.join(MANIFEST))? else {
        return Ok(());
    };

    let forbidden = lints_table(&manifest, "rust")
        .and_then(|rust| lint_level(rust, "unsafe_code"))
        .is_some_and(|level| level == "forbid" || level == "deny");
    expect(
        report,
        "Unsafe code forbidden",
        forbidden,
        Status::Warn,
        "Consider setting unsafe_code = \"forbid\" in [lints.rust]",
    );
    Ok(())
}

fn check_precommit_hooks(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join(".pre-commit-config.yaml"))? else {
        return Ok(());
    };

    expect(
        report,
        "Pre-commit has cargo fmt hook",
        FMT_HOOKS.iter().any(|hook| content.contains(hook)),
        Status::Warn,
        "Consider adding a cargo fmt pre-commit hook",
    );
    expect(
        report,
        "Pre-commit has Clippy hook",
        content.contains("clippy"),
        Status::Warn,
        "Consider adding a Clippy pre-commit hook",
    );
    Ok(())
}

fn check_devbox(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join("devbox.json"))? else {
        return Ok(());
    };

    expect(
        report,
        "Devbox includes rustup",
        content.contains("rustup"),
        Status::Warn,
        "Consider adding rustup to Devbox packages",
    );
    Ok(())
}

fn check_ci(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join(CI_WORKFLOW))? else {
        return Ok(());
    };
    let content = content.to_lowercase();

    let steps = [
        ("CI checks Rust formatting", "cargo fmt", "Consider adding cargo fmt --check to CI"),
        ("CI runs Clippy", "cargo clippy", "Consider adding cargo clippy to CI"),
        ("CI runs Rust tests", "cargo test", "Consider adding cargo test to CI"),
    ];
    for (name, needle, message) in steps {
        expect(report, name, content.contains(needle), Status::Warn, message);
    }
    Ok(())
}
