//! Check registry and the built-in check catalog.
//!
//! Checks are plain functions collected into ordered lists: one list that
//! always runs, and one list per [`Language`]. Adding a check means adding a
//! function and one `register` call in its module; the runner never changes.

pub mod base;
mod common;
mod cpp;
mod python;
mod rust_lang;
mod typescript;

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

use crate::language::Language;
use crate::types::VerificationReport;

/// A single verification rule.
///
/// Expected project deficiencies are recorded on the report. An `Err` means
/// the filesystem misbehaved and aborts the whole run.
pub type CheckFn = fn(&Path, &mut VerificationReport) -> anyhow::Result<()>;

/// Ordered collections of common and language-specific checks.
#[derive(Default, Clone)]
pub struct Registry {
    common: Vec<CheckFn>,
    languages: HashMap<Language, Vec<CheckFn>>,
}

/// Appends checks to one language's list. Obtained from [`Registry::register_language`].
pub struct LanguageRegistrar<'a> {
    checks: &'a mut Vec<CheckFn>,
}

impl LanguageRegistrar<'_> {
    /// Register a check for this language and hand it back unchanged.
    pub fn register(&mut self, check: CheckFn) -> CheckFn {
        self.checks.push(check);
        check
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the full built-in catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        common::register(&mut registry);
        cpp::register(&mut registry);
        python::register(&mut registry);
        rust_lang::register(&mut registry);
        typescript::register(&mut registry);
        registry
    }

    /// Register a check that runs for every project and hand it back unchanged.
    ///
    /// Registering the same function twice runs it twice.
    pub fn register_common(&mut self, check: CheckFn) -> CheckFn {
        self.common.push(check);
        check
    }

    /// Get a registrar for checks that only run when `language` is detected.
    pub fn register_language(&mut self, language: Language) -> LanguageRegistrar<'_> {
        LanguageRegistrar {
            checks: self.languages.entry(language).or_default(),
        }
    }

    /// Number of common checks.
    pub fn common_len(&self) -> usize {
        self.common.len()
    }

    /// Number of checks registered for `language`.
    pub fn language_len(&self, language: Language) -> usize {
        self.languages.get(&language).map_or(0, Vec::len)
    }

    /// Run the common checks, then each detected language's checks, in registration order.
    pub fn run_all(
        &self,
        path: &Path,
        languages: &BTreeSet<Language>,
        report: &mut VerificationReport,
    ) -> anyhow::Result<()> {
        debug!(count = self.common.len(), "running common checks");
        for check in &self.common {
            check(path, report)?;
        }

        for language in languages {
            let Some(checks) = self.languages.get(language) else {
                continue;
            };
            debug!(
                language = language.as_str(),
                count = checks.len(),
                "running language checks"
            );
            for check in checks {
                check(path, report)?;
            }
        }

        Ok(())
    }
}

static BUILTIN: Lazy<Registry> = Lazy::new(Registry::builtin);

/// The process-wide registry of built-in checks, built once on first use.
pub fn registry() -> &'static Registry {
    &BUILTIN
}
