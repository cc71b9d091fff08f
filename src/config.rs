//! Configuration for the command line front end
//!
//! Stored as JSON at `<config_dir>/sexpdb/config.json`. A missing file means
//! defaults; unknown fields are rejected so typos surface early.

use crate::model::Seed;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output format for command results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Compact JSON, one document per command
    #[default]
    Json,
    /// Pretty-printed JSON
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Hex seed; ids are only reproducible across runs when this is set
    pub seed: Option<String>,
    /// Weight applied to each stored file when none is given
    pub default_weight: u64,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: None,
            default_weight: 1,
            log_level: "warn".to_string(),
            format: OutputFormat::Json,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sexpdb").join("config.json"))
    }

    /// Load from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Write to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The configured seed, if any
    pub fn seed(&self) -> Result<Option<Seed>> {
        self.seed.as_deref().map(Seed::from_hex).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.seed().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            seed: Some("ab".repeat(32)),
            default_weight: 3,
            log_level: "debug".into(),
            format: OutputFormat::Text,
        };
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.seed().unwrap().unwrap().as_bytes(), &[0xabu8; 32]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_weight": 5}"#).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.default_weight, 5);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"weight": 5}"#).unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(Error::Config(_))));

        std::fs::write(&path, r#"{"seed": "beef"}"#).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert!(matches!(config.seed(), Err(Error::Config(_))));
    }
}
