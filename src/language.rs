//! Project language detection.
//!
//! Each supported language is identified by a single marker file directly
//! under the project root. Detection is independent per language, so a
//! polyglot repository reports every language whose marker is present.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Languages with a dedicated check group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    Python,
    Rust,
    TypeScript,
}

impl Language {
    /// Every known language, in detection order.
    pub const ALL: [Language; 4] = [
        Language::Cpp,
        Language::Python,
        Language::Rust,
        Language::TypeScript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
        }
    }

    /// File whose presence at the project root identifies the language.
    pub fn marker_file(&self) -> &'static str {
        match self {
            Language::Cpp => "CMakeLists.txt",
            Language::Python => "pyproject.toml",
            Language::Rust => "Cargo.toml",
            Language::TypeScript => "package.json",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detect the languages used by the project rooted at `path`.
///
/// An empty set is a valid answer: only the common checks apply.
pub fn detect_languages<P: AsRef<Path>>(path: P) -> BTreeSet<Language> {
    let root = path.as_ref();
    Language::ALL
        .into_iter()
        .filter(|language| {
            let present = root.join(language.marker_file()).exists();
            debug!(
                language = language.as_str(),
                marker = language.marker_file(),
                present,
                "probed language marker"
            );
            present
        })
        .collect()
}
