//! Norms - project convention auditor.
//!
//! Norms inspects a repository's static files and reports whether it follows
//! a catalog of conventions: license, README, CI workflow, editor settings,
//! dependency locking, and linter/formatter configuration for each detected
//! language. It never modifies the project or runs external tools.
//!
//! # Architecture
//!
//! - `language`: detects project languages from marker files
//! - `checks`: the check registry and the built-in catalog
//! - `verify`: orchestrates detection and check execution into a report
//! - `types`: check results and the verification report
//! - `config`: optional per-project config (skip list)
//! - `report`: output formatting (text, JSON)
//!
//! # Adding a Check
//!
//! Write a [`checks::CheckFn`] in the module for its language (or
//! `checks/common.rs`) and add it to that module's `register` list.

pub mod checks;
pub mod cli;
pub mod config;
pub mod language;
pub mod report;
pub mod types;
pub mod verify;

pub use checks::{registry, CheckFn, LanguageRegistrar, Registry};
pub use config::ProjectConfig;
pub use language::{detect_languages, Language};
pub use types::{CheckResult, Status, VerificationReport};
pub use verify::{verify_project, Verifier, VerifyError};
