//! Configuration loading for the genrescope service
//!
//! Resolution priority: environment variable → TOML config file → compiled
//! default. There is no settings UI and no write-back; configuration is
//! resolved once at startup and treated as read-only afterwards.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file location
pub const CONFIG_PATH_ENV: &str = "GENRESCOPE_CONFIG";

/// Default config file path, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "genrescope.toml";

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,
    /// Directory holding uploaded/downloaded audio files
    pub upload_dir: PathBuf,
    /// SQLite database containing the `music_features` catalog table
    pub catalog_db: PathBuf,
    /// Pretrained genre classifier artifact (ONNX)
    pub model_path: PathBuf,
    /// Per-genre facts file (JSON object of genre → list of facts)
    pub genre_facts_path: PathBuf,
    /// Flat JSON file receiving contact-form messages
    pub contact_log_path: PathBuf,
    /// Optional directory of static assets served under /static
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5720,
            upload_dir: PathBuf::from("uploads"),
            catalog_db: PathBuf::from("data/music_features.db"),
            model_path: PathBuf::from("model/genre_classifier.onnx"),
            genre_facts_path: PathBuf::from("data/genre_facts.json"),
            contact_log_path: PathBuf::from("data/contacts.json"),
            static_dir: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Reads the TOML file named by `GENRESCOPE_CONFIG` (falling back to
    /// `./genrescope.toml`), then applies environment overrides. A missing
    /// config file is not an error; defaults apply.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            let config = Self::from_file(&path)?;
            info!(path = %path.display(), "Loaded configuration file");
            config
        } else {
            info!(path = %path.display(), "No configuration file, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Apply `GENRESCOPE_*` environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("GENRESCOPE_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!(value = %port, "Ignoring unparseable GENRESCOPE_PORT"),
            }
        }
        if let Ok(dir) = std::env::var("GENRESCOPE_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Ok(db) = std::env::var("GENRESCOPE_CATALOG_DB") {
            self.catalog_db = PathBuf::from(db);
        }
        if let Ok(model) = std::env::var("GENRESCOPE_MODEL_PATH") {
            self.model_path = PathBuf::from(model);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.port, 5720);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genrescope.toml");
        std::fs::write(&path, "port = 8080\nupload_dir = \"/srv/music\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.upload_dir, PathBuf::from("/srv/music"));
        // Unspecified fields keep their defaults
        assert_eq!(config.model_path, PathBuf::from("model/genre_classifier.onnx"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genrescope.toml");
        std::fs::write(&path, "port = \"not a number").unwrap();

        assert!(Config::from_file(&path).is_err());
    }
}
