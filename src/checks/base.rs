//! Shared helpers for check functions: file probes and config parsing.

use anyhow::Context;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

use crate::types::Status;

/// Distinguishable failure from the structured-config parsers.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Report whether a file exists.
///
/// Returns PASS with an empty message, or `fail_status` with `fail_message`
/// (default `Missing <file name>`).
pub fn check_file_exists(
    path: &Path,
    fail_status: Status,
    fail_message: Option<&str>,
) -> (Status, String) {
    if path.exists() {
        return (Status::Pass, String::new());
    }

    let message = match fail_message {
        Some(m) => m.to_string(),
        None => format!(
            "Missing {}",
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string())
        ),
    };
    (fail_status, message)
}

/// Read the raw bytes of a file the caller has already seen exist.
pub fn read_bytes(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Read a file the caller has already seen exist, as text for substring matching.
///
/// Invalid UTF-8 is replaced rather than rejected; structured files go through
/// [`parse_toml`]/[`parse_json`] instead, which report it.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    Ok(String::from_utf8_lossy(&read_bytes(path)?).into_owned())
}

/// Read a file if it exists, `None` otherwise.
pub fn read_optional(path: &Path) -> anyhow::Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    read_text(path).map(Some)
}

pub fn parse_toml(content: impl AsRef<[u8]>) -> Result<toml::Table, ParseError> {
    let text = std::str::from_utf8(content.as_ref())?;
    Ok(toml::from_str::<toml::Table>(text)?)
}

pub fn parse_json(content: impl AsRef<[u8]>) -> Result<serde_json::Value, ParseError> {
    let text = std::str::from_utf8(content.as_ref())?;
    Ok(serde_json::from_str(text)?)
}

/// Load a TOML file for checks that depend on it.
///
/// Missing or invalid files yield `None`; their existence and syntax are
/// reported by the check that owns the file.
pub fn load_toml(path: &Path) -> anyhow::Result<Option<toml::Table>> {
    if !path.is_file() {
        return Ok(None);
    }
    Ok(parse_toml(read_bytes(path)?).ok())
}

/// Load a JSON file for checks that depend on it. See [`load_toml`].
pub fn load_json(path: &Path) -> anyhow::Result<Option<serde_json::Value>> {
    if !path.is_file() {
        return Ok(None);
    }
    Ok(parse_json(read_bytes(path)?).ok())
}

/// Immediate subdirectories of `dir`.
pub fn child_dirs(dir: &Path) -> anyhow::Result<Vec<std::path::PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        // Follows symlinks; a dangling link is not a directory.
        if entry.path().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// First of `candidates` that exists under `root`.
pub fn first_existing<'a>(root: &Path, candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|name| root.join(name).exists())
}

/// Look up a nested TOML table by key path, e.g. `["tool", "ruff"]`.
pub fn toml_table<'a>(table: &'a toml::Table, keys: &[&str]) -> Option<&'a toml::Table> {
    let mut current = table;
    for key in keys {
        current = current.get(*key)?.as_table()?;
    }
    Some(current)
}

/// Truthiness of a config value: `true`, non-zero, or non-empty.
pub fn toml_truthy(value: Option<&toml::Value>) -> bool {
    match value {
        None => false,
        Some(toml::Value::Boolean(b)) => *b,
        Some(toml::Value::Integer(i)) => *i != 0,
        Some(toml::Value::Float(f)) => *f != 0.0,
        Some(toml::Value::String(s)) => !s.is_empty(),
        Some(toml::Value::Array(a)) => !a.is_empty(),
        Some(toml::Value::Table(t)) => !t.is_empty(),
        Some(toml::Value::Datetime(_)) => true,
    }
}

/// Whether a TOML array contains the string `needle`.
pub fn toml_array_contains(value: Option<&toml::Value>, needle: &str) -> bool {
    value
        .and_then(toml::Value::as_array)
        .is_some_and(|items| items.iter().any(|v| v.as_str() == Some(needle)))
}

/// Truthiness of a JSON value, with the same rules as [`toml_truthy`].
pub fn json_truthy(value: Option<&serde_json::Value>) -> bool {
    use serde_json::Value;
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Record `name` as PASS when `ok`, otherwise with `status` and `message`.
pub fn expect(
    report: &mut crate::types::VerificationReport,
    name: &str,
    ok: bool,
    status: Status,
    message: &str,
) {
    if ok {
        report.pass(name);
    } else {
        report.add(name, status, message);
    }
}
