//! Per-project configuration.
//!
//! A project may carry a small YAML file that tunes how it is audited:
//!
//! ```yaml
//! skip:
//!   - Renovate configuration
//!   - Devbox configuration
//! ```
//!
//! Results whose name appears under `skip` are recorded as SKIP.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file names searched for in the audited project root, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &[".norms.yaml", "norms.yaml"];

/// Errors loading a project config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Check result names to record as SKIP.
    #[serde(default)]
    pub skip: Vec<String>,
}

impl ProjectConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is a valid, empty config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load the config for the project at `root`.
    ///
    /// `explicit` wins over discovery; without either, defaults apply.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit.map(Path::to_path_buf).or_else(|| discover(root)) {
            Some(path) => Self::parse_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Find a config file in the project root.
pub fn discover(root: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skip_list() {
        let config = ProjectConfig::parse_str("skip:\n  - README\n  - Renovate configuration\n")
            .unwrap();
        assert_eq!(config.skip, vec!["README", "Renovate configuration"]);
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(ProjectConfig::parse_str("").unwrap().skip.is_empty());
        assert!(ProjectConfig::parse_str("ignore: [x]\n").is_err());
    }

    #[test]
    fn test_discovery_order() {
        let temp = TempDir::new().unwrap();
        assert!(discover(temp.path()).is_none());

        std::fs::write(temp.path().join("norms.yaml"), "skip: [a]\n").unwrap();
        assert_eq!(discover(temp.path()), Some(temp.path().join("norms.yaml")));

        std::fs::write(temp.path().join(".norms.yaml"), "skip: [b]\n").unwrap();
        assert_eq!(discover(temp.path()), Some(temp.path().join(".norms.yaml")));

        let config = ProjectConfig::load(temp.path(), None).unwrap();
        assert_eq!(config.skip, vec!["b"]);
    }

    #[test]
    fn test_explicit_path_wins() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".norms.yaml"), "skip: [a]\n").unwrap();
        let other = temp.path().join("custom.yaml");
        std::fs::write(&other, "skip: [c]\n").unwrap();

        let config = ProjectConfig::load(temp.path(), Some(&other)).unwrap();
        assert_eq!(config.skip, vec!["c"]);
    }

    #[test]
    fn test_errors() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(matches!(
            ProjectConfig::load(temp.path(), Some(&missing)),
            Err(ConfigError::Read { .. })
        ));

        std::fs::write(temp.path().join(".norms.yaml"), "skip: [unclosed\n").unwrap();
        assert!(matches!(
            ProjectConfig::load(temp.path(), None),
            Err(ConfigError::Parse { .. })
        ));
    }
}
