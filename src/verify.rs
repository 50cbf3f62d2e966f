//! Verification orchestration: detect languages, run checks, finish the report.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::checks::{self, Registry};
use crate::config::{ConfigError, ProjectConfig};
use crate::language::detect_languages;
use crate::types::{Status, VerificationReport};

/// Name of the structural note added when no language is detected.
pub const LANGUAGE_DETECTION: &str = "Language detection";

/// Reasons a verification run cannot produce a report.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("The path '{}' is not a valid directory.", .0.display())]
    NotADirectory(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A check hit an unexpected filesystem fault.
    #[error(transparent)]
    Check(#[from] anyhow::Error),
}

/// Runs a registry of checks against a project directory.
pub struct Verifier<'a> {
    registry: &'a Registry,
    config: Option<ProjectConfig>,
    config_path: Option<PathBuf>,
}

impl Default for Verifier<'static> {
    fn default() -> Self {
        Self::new(checks::registry())
    }
}

impl<'a> Verifier<'a> {
    /// Create a verifier that runs the checks in `registry`.
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            config: None,
            config_path: None,
        }
    }

    /// Use this config instead of discovering one in the project.
    pub fn config(mut self, config: ProjectConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the config from this file instead of discovering one in the project.
    pub fn config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Verify the project at `path`.
    ///
    /// Fails before any check runs if `path` is not a directory.
    pub fn run(&self, path: &Path) -> Result<VerificationReport, VerifyError> {
        if !path.is_dir() {
            return Err(VerifyError::NotADirectory(path.to_path_buf()));
        }

        let config = match &self.config {
            Some(config) => config.clone(),
            None => ProjectConfig::load(path, self.config_path.as_deref())?,
        };

        let languages = detect_languages(path);
        info!(
            path = %path.display(),
            languages = ?languages.iter().map(|l| l.as_str()).collect::<Vec<_>>(),
            "detected languages"
        );

        let mut report = VerificationReport::new(path, languages.clone()).with_skips(config.skip);
        self.registry.run_all(path, &languages, &mut report)?;

        if languages.is_empty() {
            warn!(path = %path.display(), "no supported language detected");
            report.add(
                LANGUAGE_DETECTION,
                Status::Warn,
                "No supported programming languages detected",
            );
        }

        info!(
            passed = report.passed(),
            failed = report.failed(),
            warnings = report.warnings(),
            skipped = report.skipped(),
            "verification finished"
        );
        Ok(report)
    }
}

/// Verify the project at `path` with the built-in checks and its own config file.
pub fn verify_project<P: AsRef<Path>>(path: P) -> Result<VerificationReport, VerifyError> {
    Verifier::default().run(path.as_ref())
}
