//! Configuration management module.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::{RepositoryType, RetryPolicy};

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub backend: BackendConfig,
    pub retry: RetryConfig,
}

/// Local snapshot persistence mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Volatile in-memory snapshot, mostly for demos and tests.
    Memory,
    /// JSON file snapshot.
    File,
}

/// Local snapshot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub mode: StorageMode,
    pub data_path: PathBuf,
}

/// Remote backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub enabled: bool,
    pub url: String,
    pub repository_type: RepositoryType,
    /// HTTP request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Retry settings for backend calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl AppConfig {
    /// Get the per-user config file path.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "orgdesk")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.mode == StorageMode::File && self.storage.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "Data path cannot be empty in file mode".to_string(),
            ));
        }
        if self.backend.enabled {
            if self.backend.url.trim().is_empty() {
                return Err(ConfigError::Validation("Backend URL cannot be empty".to_string()));
            }
            if !self.backend.url.starts_with("http") {
                return Err(ConfigError::Validation(
                    "Backend URL must start with http:// or https://".to_string(),
                ));
            }
        }
        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Backend timeout must be at least 1 second".to_string(),
            ));
        }
        if self.backend.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "Backend timeout cannot exceed 300 seconds".to_string(),
            ));
        }
        if self.retry.max_attempts < 1 {
            return Err(ConfigError::Validation("Retry attempts must be at least 1".to_string()));
        }
        if self.retry.max_attempts > 10 {
            return Err(ConfigError::Validation("Retry attempts cannot exceed 10".to_string()));
        }
        if self.retry.delay_ms > 60_000 {
            return Err(ConfigError::Validation(
                "Retry delay cannot exceed 60 seconds".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl BackendConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RetryConfig {
    /// Build the retry policy for backend calls.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_path = directories::ProjectDirs::from("", "", "orgdesk")
            .map(|dirs| dirs.data_dir().join("departments.json"))
            .unwrap_or_else(|| PathBuf::from("departments.json"));
        Self {
            mode: StorageMode::File,
            data_path,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://localhost:8028/api".to_string(),
            repository_type: RepositoryType::PostgreSql,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_data_path_in_file_mode() {
        let mut config = AppConfig::default();
        config.storage.data_path = PathBuf::new();
        assert!(config.validate().is_err());

        config.storage.mode = StorageMode::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_backend_url() {
        let mut config = AppConfig::default();
        config.backend.enabled = true;
        config.backend.url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());

        config.backend.url = "http://localhost:8028/api".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_backend_url_ignored_when_disabled() {
        let mut config = AppConfig::default();
        config.backend.url = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_timeout_bounds() {
        let mut config = AppConfig::default();

        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.backend.timeout_secs = 301;
        assert!(config.validate().is_err());

        config.backend.timeout_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_retry_bounds() {
        let mut config = AppConfig::default();

        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        config.retry.max_attempts = 11;
        assert!(config.validate().is_err());

        config.retry.max_attempts = 3;
        config.retry.delay_ms = 120_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.backend.enabled = true;
        config.backend.repository_type = RepositoryType::MongoDb;
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => {
                assert!(loaded.backend.enabled);
                assert_eq!(loaded.backend.repository_type, RepositoryType::MongoDb);
                assert_eq!(loaded.storage.mode, StorageMode::File);
            }
            other => panic!("expected loaded config, got {other:?}"),
        }
    }

    #[test]
    fn test_try_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::try_load(&dir.path().join("absent.toml"));
        assert!(matches!(result, ConfigLoadResult::Missing));
    }

    #[test]
    fn test_try_load_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "storage = \"not a table\"").unwrap();

        let result = AppConfig::try_load(&path);
        assert!(matches!(result, ConfigLoadResult::Invalid(_)));
    }
}
