//! C++ project checks (CMake, clang-format, clang-tidy).

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::base::{check_file_exists, expect, parse_json, read_bytes, read_optional, read_text};
use super::common::CI_WORKFLOW;
use super::{CheckFn, Registry};
use crate::language::Language;
use crate::types::{Status, VerificationReport};

const CMAKE_LISTS: &str = "CMakeLists.txt";
const CMAKE_PRESETS: &str = "CMakePresets.json";

lazy_static! {
    static ref CMAKE_MINIMUM: Regex =
        Regex::new(r"(?mi)^\s*cmake_minimum_required\s*\(").unwrap();
    static ref CMAKE_PROJECT: Regex = Regex::new(r"(?mi)^\s*project\s*\(").unwrap();
    /// Either `set(CMAKE_CXX_STANDARD 20)` or a `cxx_std_20` compile feature.
    static ref CXX_STANDARD: Regex =
        Regex::new(r"CMAKE_CXX_STANDARD\s+\d+|cxx_std_\d+").unwrap();
    static ref CLANG_TIDY_CHECKS: Regex = Regex::new(r"(?m)^Checks\s*:").unwrap();
}

pub(super) fn register(registry: &mut Registry) {
    let checks: &[CheckFn] = &[
        check_cmake_lists,
        check_cmake_presets,
        check_clang_format,
        check_clang_tidy,
        check_precommit_hooks,
        check_devbox,
        check_ci,
    ];
    let mut cpp = registry.register_language(Language::Cpp);
    for check in checks {
        cpp.register(*check);
    }
}

fn check_cmake_lists(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let cmake_path = path.join(CMAKE_LISTS);
    let (status, message) = check_file_exists(&cmake_path, Status::Fail, None);
    report.add("CMakeLists.txt exists", status, message);
    if status != Status::Pass {
        return Ok(());
    }

    let content = read_text(&cmake_path)?;
    expect(
        report,
        "CMake minimum version declared",
        CMAKE_MINIMUM.is_match(&content),
        Status::Fail,
        "Missing cmake_minimum_required()",
    );
    expect(
        report,
        "CMake project declared",
        CMAKE_PROJECT.is_match(&content),
        Status::Fail,
        "Missing project()",
    );
    expect(
        report,
        "C++ standard set",
        CXX_STANDARD.is_match(&content),
        Status::Warn,
        "Consider setting CMAKE_CXX_STANDARD or a cxx_std_* feature",
    );
    Ok(())
}

fn check_cmake_presets(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let presets_path = path.join(CMAKE_PRESETS);
    let (status, message) = check_file_exists(
        &presets_path,
        Status::Warn,
        Some("Consider adding CMakePresets.json"),
    );
    report.add("CMake presets exist", status, message);
    if status != Status::Pass {
        return Ok(());
    }

    let presets = match parse_json(read_bytes(&presets_path)?) {
        Ok(presets) => {
            report.pass("CMake presets valid JSON");
            presets
        }
        Err(e) => {
            report.add("CMake presets valid JSON", Status::Fail, e.to_string());
            return Ok(());
        }
    };

    let has_configure = presets
        .get("configurePresets")
        .and_then(serde_json::Value::as_array)
        .is_some_and(|p| !p.is_empty());
    expect(
        report,
        "CMake presets define configurePresets",
        has_configure,
        Status::Warn,
        "No configurePresets defined",
    );
    Ok(())
}

fn check_clang_format(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let (status, message) = check_file_exists(&path.join(".clang-format"), Status::Fail, None);
    report.add("clang-format configuration", status, message);
    Ok(())
}

fn check_clang_tidy(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join(".clang-tidy"))? else {
        report.add(
            "clang-tidy configuration",
            Status::Warn,
            "Missing .clang-tidy",
        );
        return Ok(());
    };
    report.pass("clang-tidy configuration");

    expect(
        report,
        "clang-tidy checks selected",
        CLANG_TIDY_CHECKS.is_match(&content),
        Status::Warn,
        "Consider listing Checks in .clang-tidy",
    );
    Ok(())
}

fn check_precommit_hooks(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join(".pre-commit-config.yaml"))? else {
        return Ok(());
    };

    expect(
        report,
        "Pre-commit has clang-format hook",
        content.contains("clang-format"),
        Status::Warn,
        "Consider adding a clang-format pre-commit hook",
    );
    Ok(())
}

fn check_devbox(path: &Path, report: &mut VerificationReport) -> anyhow::Result<()> {
    let Some(content) = read_optional(&path.join("devbox.json"))? else {
        return Ok(());
    };

    expect(
        report,
        "Devbox includes cmake",
        content.contains("cmake"),
        Status::Warn,
        "Consider adding cmake to Devbox packages",
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
        "CI runs CMake build",
        content.contains("cmake --build") || content.contains("cmake --workflow"),
        Status::Warn,
        "Consider adding a CMake build to CI",
    );
    expect(
        report,
        "CI runs C++ tests",
        content.contains("ctest"),
        Status::Warn,
        "Consider running ctest in CI",
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
        let languages = BTreeSet::from([Language::Cpp]);
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
    fn test_cmake_content() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CMAKE_LISTS),
            concat!(
                "cmake_minimum_required(VERSION 3.28)\n",
                "project(demo CXX)\n",
                "target_compile_features(demo PRIVATE cxx_std_20)\n",
            ),
        )
        .unwrap();

        let report = run_all(temp.path());
        assert_eq!(status_of(&report, "CMake minimum version declared"), Some(Status::Pass));
        assert_eq!(status_of(&report, "CMake project declared"), Some(Status::Pass));
        assert_eq!(status_of(&report, "C++ standard set"), Some(Status::Pass));
        assert_eq!(status_of(&report, "CMake presets exist"), Some(Status::Warn));
        assert_eq!(status_of(&report, "clang-format configuration"), Some(Status::Fail));
        assert_eq!(status_of(&report, "clang-tidy configuration"), Some(Status::Warn));
    }

    #[test]
    fn test_cmake_missing_declarations() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CMAKE_LISTS), "add_executable(demo main.cpp)\n").unwrap();

        let report = run_all(temp.path());
        assert_eq!(status_of(&report, "CMake minimum version declared"), Some(Status::Fail));
        assert_eq!(status_of(&report, "CMake project declared"), Some(Status::Fail));
        assert_eq!(status_of(&report, "C++ standard set"), Some(Status::Warn));
    }

    #[test]
    fn test_presets_invalid_json_short_circuits() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CMAKE_PRESETS), "{\"version\": 6,").unwrap();

        let report = run_all(temp.path());
        assert_eq!(status_of(&report, "CMake presets exist"), Some(Status::Pass));
        assert_eq!(status_of(&report, "CMake presets valid JSON"), Some(Status::Fail));
        assert_eq!(status_of(&report, "CMake presets define configurePresets"), None);
    }

    #[test]
    fn test_presets_and_tidy() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CMAKE_PRESETS),
            r#"{"version": 6, "configurePresets": [{"name": "debug"}]}"#,
        )
        .unwrap();
        std::fs::write(temp.path().join(".clang-format"), "BasedOnStyle: LLVM\n").unwrap();
        std::fs::write(temp.path().join(".clang-tidy"), "Checks: '-*,modernize-*'\n").unwrap();

        let report = run_all(temp.path());
        assert_eq!(
            status_of(&report, "CMake presets define configurePresets"),
            Some(Status::Pass)
        );
        assert_eq!(status_of(&report, "clang-format configuration"), Some(Status::Pass));
        assert_eq!(status_of(&report, "clang-tidy checks selected"), Some(Status::Pass));
    }

    #[test]
    fn test_ci_steps() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".github/workflows")).unwrap();
        std::fs::write(
            temp.path().join(CI_WORKFLOW),
            "- run: cmake --build build\n- run: ctest --test-dir build\n",
        )
        .unwrap();

        let report = run_all(temp.path());
        assert_eq!(status_of(&report, "CI runs CMake build"), Some(Status::Pass));
        assert_eq!(status_of(&report, "CI runs C++ tests"), Some(Status::Pass));
    }
}
