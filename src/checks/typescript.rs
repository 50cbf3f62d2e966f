//! TypeScript / web project checks (`package.json`, `tsconfig.json`, ESLint, Prettier).

use std::path::Path;

use super::base::{
    check_file_exists, expect, first_existing, json_truthy, load_json, parse_json, read_bytes,
    read_optional,
};
use super::common::CI_WORKFLOW;
use super::{CheckFn, Registry};
use crate::language::Language;
use crate::types::{Status, VerificationReport};

const PACKAGE_JSON: &str = "package.json";
const TSCONFIG: &str = "tsconfig.json";

const LOCKFILES: &[&str] = &[
    "package-lock.json",
    "pnpm-lock.yaml",
    "yarn.lock",
    "bun.lockb",
    "bun.lock",
];

const ESLINT_CONFIGS: &[&str] = &[
    "eslint.config.js",
    "eslint.config.mjs",
    "eslint.config.cjs",
    "eslint.config.ts",
    "eslint.config.mts",
];

const PRETTIER_CONFIGS: &[&str] = &[
    ".prettierrc",
    ".prettierrc.json",
    ".prettierrc.yaml",
    ".prettierrc.yml",
    ".prettierrc.js",
    ".prettierrc.mjs",
    "prettier.config.js",
    "prettier.config.mjs",
];

/// Scripts every package should define.
const REQUIRED_SCRIPTS: &[&str] = &["build", "lint", "test"];

pub(super) fn register(registry: &mut Registry) {
    let checks: &[CheckFn] = &[
        check_package_json,
        check_lockfile,
        check_tsconfig,
        check_eslint,
        check_prettier,
        check_precommit_hooks,
        check_devbox,
        check_ci,
    ];
    let mut typescript = registry.register_language(Language::TypeScript);
    for check in checks {
        typescript.register(*check);
    }
}

fn check_package_json(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let package_path = path.join(PACKAGE_JSON);
    let (status, message) = check_file_exists(&package_path, Status::Fail, None);
    report.add("package.json exists", status, message);
    if status != Status::Pass {
        return Ok(());
    }

    let package = match parse_json(read_bytes(&package_path)?) {
        Ok(package) => {
            report.pass("package.json valid JSON");
            package
        }
        Err(e) => {
            report.add("package.json valid JSON", Status::Fail, e.to_string());
            return Ok(());
        }
    };

    expect(
        report,
        "package.json has name",
        json_truthy(package.get("name")),
        Status::Fail,
        "Missing \"name\" field",
    );

    let Some(scripts) = package
        .get("scripts")
        .and_then(serde_json::Value::as_object)
        .filter(|s| !s.is_empty())
    else {
        report.add(
            "package.json has scripts",
            Status::Warn,
            "No scripts defined",
        );
        return Ok(());
    };
    report.pass("package.json has scripts");

    for script in REQUIRED_SCRIPTS {
        expect(
            report,
            &format!("package.json has {} script", script),
            scripts.contains_key(*script),
            Status::Warn,
            &format!("Consider adding a \"{}\" script", script),
        );
    }
    Ok(())
}

fn check_lockfile(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    expect(
        report,
        "Dependency lockfile exists",
        first_existing(path, LOCKFILES).is_some(),
        Status::Warn,
        "Consider committing a lockfile for dependency locking",
    );
    Ok(())
}

fn check_tsconfig(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let tsconfig_path = path.join(TSCONFIG);
    let (status, message) = check_file_exists(&tsconfig_path, Status::Fail, None);
    report.add("tsconfig.json exists", status, message);
    if status != Status::Pass {
        return Ok(());
    }

    let tsconfig = match parse_json(read_bytes(&tsconfig_path)?) {
        Ok(tsconfig) => {
            report.pass("tsconfig.json valid JSON");
            tsconfig
        }
        Err(e) => {
            report.add("tsconfig.json valid JSON", Status::Fail, e.to_string());
            return Ok(());
        }
    };

    let strict = tsconfig
        .get("compilerOptions")
        .and_then(|options| options.get("strict"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);
    expect(
        report,
        "TypeScript strict mode enabled",
        strict,
        Status::Warn,
        "Consider enabling compilerOptions.strict",
    );
    Ok(())
}

fn check_eslint(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    expect(
        report,
        "ESLint is configured",
        first_existing(path, ESLINT_CONFIGS).is_some(),
        Status::Fail,
        "Missing eslint.config.js (flat config)",
    );
    Ok(())
}

fn check_prettier(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let in_package = load_json(&path.join(PACKAGE_JSON))?
        .is_some_and(|package| json_truthy(package.get("prettier")));
    expect(
        report,
        "Prettier is configured",
        in_package || first_existing(path, PRETTIER_CONFIGS).is_some(),
        Status::Warn,
        "Consider adding a Prettier configuration",
    );
    Ok(())
}

fn check_precommit_hooks(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join(".pre-commit-config.yaml"))? else {
        return Ok(());
    };

    expect(
        report,
        "Pre-commit has ESLint hook",
        content.contains("eslint"),
        Status::Warn,
        "Consider adding an ESLint pre-commit hook",
    );
    expect(
        report,
        "Pre-commit has Prettier hook",
        content.contains("prettier"),
        Status::Warn,
        "Consider adding a Prettier pre-commit hook",
    );
    Ok(())
}

fn check_devbox(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join("devbox.json"))? else {
        return Ok(());
    };

    expect(
        report,
        "Devbox includes nodejs",
        content.contains("nodejs"),
        Status::Warn,
        "Consider adding nodejs to Devbox packages",
    );
    Ok(())
}

fn check_ci(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join(CI_WORKFLOW))? else {
        return Ok(());
    };
    let content = content.to_lowercase();

    expect(
        report,
        "CI runs JavaScript linting",
        content.contains("eslint") || content.contains("run lint"),
        Status::Warn,
        "Consider adding lint check to CI",
    );
    expect(
        report,
        "CI runs JavaScript tests",
        content.contains("run test") || content.contains("vitest") || content.contains("jest"),
        Status::Warn,
        "Consider adding tests to CI",
    );
    expect(
        report,
        "CI runs TypeScript type checking",
        content.contains("tsc"),
        Status::Warn,
        "Consider adding tsc --noEmit to CI",
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn run_all(root: &Path) -> VerificationReport {
        let mut registry = Registry::new();
        register(&mut registry);
        let languages = BTreeSet::from([Language::TypeScript]);
        let mut report = VerificationReport::new(root, languages.clone());
        registry.run_all(root, &languages, &mut report).unwrap();
        report
    }

    fn status_of(report: &VerificationReport, name: &str) -> Option<Status> {
        report
            .results()
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.status)
    }

    #[test]
    fn test_compliant_package() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(PACKAGE_JSON),
            r#"{
  "name": "demo",
  "scripts": { "build": "tsc", "lint": "eslint .", "test": "vitest" },
  "prettier": { "semi": false }
}"#,
        )
        .unwrap();
        std::fs::write(temp.path().join("pnpm-lock.yaml"), "").unwrap();
        std::fs::write(
            temp.path().join(TSCONFIG),
            r#"{"compilerOptions": {"strict": true}}"#,
        )
        .unwrap();
        std::fs::write(temp.path().join("eslint.config.mjs"), "export default [];").unwrap();

        let report = run_all(temp.path());
        let not_passing: Vec<_> = report
            .results()
            .iter()
            .filter(|r| r.status != Status::Pass)
            .collect();
        assert!(not_passing.is_empty(), "unexpected: {:?}", not_passing);
        assert_eq!(status_of(&report, "Prettier is configured"), Some(Status::Pass));
    }

    #[test]
    fn test_invalid_package_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(PACKAGE_JSON), "{\"name\": ").unwrap();

        let report = run_all(temp.path());
        assert_eq!(status_of(&report, "package.json exists"), Some(Status::Pass));
        assert_eq!(status_of(&report, "package.json valid JSON"), Some(Status::Fail));
        assert_eq!(status_of(&report, "package.json has name"), None);
        assert_eq!(status_of(&report, "package.json has scripts"), None);
        assert_eq!(status_of(&report, "Prettier is configured"), Some(Status::Warn));
    }

    #[test]
    fn test_missing_scripts_and_tsconfig() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(PACKAGE_JSON),
            r#"{"name": "demo", "scripts": {"build": "tsc"}}"#,
        )
        .unwrap();

        let report = run_all(temp.path());
        assert_eq!(status_of(&report, "package.json has build script"), Some(Status::Pass));
        assert_eq!(status_of(&report, "package.json has lint script"), Some(Status::Warn));
        assert_eq!(status_of(&report, "package.json has test script"), Some(Status::Warn));
        assert_eq!(status_of(&report, "tsconfig.json exists"), Some(Status::Fail));
        assert_eq!(status_of(&report, "TypeScript strict mode enabled"), None);
        assert_eq!(status_of(&report, "ESLint is configured"), Some(Status::Fail));
        assert_eq!(status_of(&report, "Dependency lockfile exists"), Some(Status::Warn));
    }

    #[test]
    fn test_tsconfig_without_strict() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(TSCONFIG), r#"{"compilerOptions": {}}"#).unwrap();

        let report = run_all(temp.path());
        assert_eq!(status_of(&report, "tsconfig.json valid JSON"), Some(Status::Pass));
        assert_eq!(status_of(&report, "TypeScript strict mode enabled"), Some(Status::Warn));
    }

    #[test]
    fn test_ci_steps() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".github/workflows")).unwrap();
        std::fs::write(
            temp.path().join(CI_WORKFLOW),
            "- run: pnpm run lint\n- run: pnpm exec tsc --noEmit\n",
        )
        .unwrap();

        let report = run_all(temp.path());
        assert_eq!(status_of(&report, "CI runs JavaScript linting"), Some(Status::Pass));
        assert_eq!(status_of(&report, "CI runs JavaScript tests"), Some(Status::Warn));
        assert_eq!(status_of(&report, "CI runs TypeScript type checking"), Some(Status::Pass));
    }
}
