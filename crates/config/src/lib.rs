//! Settings for the festival content API.
//!
//! Values come from `config/config.yaml` when present and from the
//! environment otherwise (`SANITY_*`, `CACHE_*`, `LOG_*`, `SERVER_*`).
//! The content layer receives plain structs and never reads env vars itself.

use std::path::Path;
use thiserror::Error;

pub mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config file in {paths}")]
    FileNotFound { paths: String },

    #[error("Cannot read config file: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Invalid YAML in config file: {source}")]
    ParseError {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ApiConfig {
    /// Parse one YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ApiConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// First existing file of `config/config.yaml`, `config.yaml`,
    /// `config/default.yaml`
    pub fn load() -> Result<Self, ConfigError> {
        let config_paths = ["config/config.yaml", "config.yaml", "config/default.yaml"];

        for path in &config_paths {
            if std::path::Path::new(path).exists() {
                return Self::load_from_file(path);
            }
        }

        Err(ConfigError::FileNotFound {
            paths: config_paths.join(", "),
        })
    }

    /// Prefer a config file, otherwise read the environment
    pub fn load_or_env() -> Result<Self, ConfigError> {
        match Self::load() {
            Ok(config) => Ok(config),
            Err(ConfigError::FileNotFound { .. }) => Self::from_env().map_err(ConfigError::Invalid),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
sanity:
  project_id: "fest1234"
  read_token: "secret"
  visual_editing: true
cache:
  mode: development
logging:
  level: debug
  format: json
"#
        )
        .unwrap();

        let config = ApiConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.sanity.project_id, "fest1234");
        assert_eq!(config.sanity.dataset, "production");
        assert_eq!(config.sanity.api_version, "2024-01-01");
        assert!(config.sanity.visual_editing);
        assert_eq!(config.cache.mode, CacheMode::Development);
        assert_eq!(config.cache.durations().event, 1);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_studio_url_in_file_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
sanity:
  project_id: "fest1234"
  studio_url: "https://festival.sanity.studio"
"#
        )
        .unwrap();

        let config = ApiConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.sanity.project_id, "fest1234");
        assert!(!config.sanity.visual_editing);
    }

    #[test]
    fn test_load_from_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sanity: [not, a, map]").unwrap();

        let result = ApiConfig::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
