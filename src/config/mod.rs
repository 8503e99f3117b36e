//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Where rows are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceBackend {
    /// Table exports under `data_dir/tables/`
    #[default]
    Jsonl,
    /// PostgREST endpoint
    Rest,
}

/// Data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub backend: SourceBackend,

    /// REST root, e.g. `https://<project>.supabase.co/rest/v1`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_key_env() -> String {
    "LADDER_BOARD_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backend: SourceBackend::default(),
            base_url: None,
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Query tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Ids per batched lookup
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    100
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            source: SourceConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if self.source.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Source timeout must be greater than 0".to_string(),
            ));
        }

        if self.source.backend == SourceBackend::Rest && self.source.base_url.is_none() {
            return Err(ConfigError::ValidationError(
                "The rest backend requires source.base_url".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.source.backend, SourceBackend::Jsonl);
        assert_eq!(config.query.batch_size, 100);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_batch_size() {
        let mut config = AppConfig::default();
        config.query.batch_size = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.source.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rest_backend_requires_base_url() {
        let mut config = AppConfig::default();
        config.source.backend = SourceBackend::Rest;
        assert!(config.validate().is_err());

        config.source.base_url = Some("https://db.example.com/rest/v1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/ladder\"\n\n[source]\nbackend = \"rest\"\nbase_url = \"https://db.example.com/rest/v1\"\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/ladder"));
        assert_eq!(config.source.backend, SourceBackend::Rest);
        assert_eq!(config.source.api_key_env, "LADDER_BOARD_API_KEY");
        assert_eq!(config.query.batch_size, 100);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let parsed: Result<AppConfig, _> = toml::from_str("[source]\nbackend = \"mysql\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.query.batch_size, 100);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.source.backend, parsed.source.backend);
    }
}
