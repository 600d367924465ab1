//! Configuration management for peerconnect.
//!
//! Configuration is loaded with figment from defaults, a TOML file and
//! `PEERCONNECT_` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "peerconnect";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "local_storage.db";

/// Upper bound for the discovery loading delay.
const MAX_LOADING_DELAY_MS: u64 = 60_000;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PEERCONNECT_`, sections
///    separated by `__`, e.g. `PEERCONNECT_DISCOVERY__LOADING_DELAY_MS`)
/// 2. TOML config file at `~/.config/peerconnect/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Discovery view configuration.
    pub discovery: DiscoveryConfig,
    /// Student directory configuration.
    pub directory: DirectoryConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the key-value database file.
    /// Defaults to `~/.local/share/peerconnect/local_storage.db`
    pub database_path: Option<PathBuf>,
}

/// Discovery view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Artificial delay before the student list is shown, in milliseconds.
    pub loading_delay_ms: u64,
}

/// Student directory configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// JSON file of student records replacing the built-in directory.
    pub path: Option<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            loading_delay_ms: 900,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("PEERCONNECT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.discovery.loading_delay_ms > MAX_LOADING_DELAY_MS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "loading_delay_ms ({}) cannot be greater than {MAX_LOADING_DELAY_MS}",
                    self.discovery.loading_delay_ms
                ),
            });
        }

        if let Some(path) = &self.directory.path {
            if !path.is_file() {
                return Err(Error::ConfigValidation {
                    message: format!("directory file not found: {}", path.display()),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the discovery loading delay as a Duration.
    #[must_use]
    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.discovery.loading_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.discovery.loading_delay_ms, 900);
        assert!(config.directory.path.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_loading_delay_too_large() {
        let mut config = Config::default();
        config.discovery.loading_delay_ms = MAX_LOADING_DELAY_MS + 1;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("loading_delay_ms"));
    }

    #[test]
    fn test_validate_zero_loading_delay() {
        let mut config = Config::default();
        config.discovery.loading_delay_ms = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_directory_file() {
        let mut config = Config::default();
        config.directory.path = Some(PathBuf::from("/nonexistent/students.json"));

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("directory file not found"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("local_storage.db"));
        assert!(path.to_string_lossy().contains("peerconnect"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/kv.db"));

        assert_eq!(config.database_path(), PathBuf::from("/custom/path/kv.db"));
    }

    #[test]
    fn test_loading_delay() {
        assert_eq!(
            Config::default().loading_delay(),
            Duration::from_millis(900)
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("peerconnect"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            // A missing file falls back to defaults
            let config =
                Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_all_sections_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file("students.json", "[]")?;
            let students = jail.directory().join("students.json");
            jail.create_file(
                "config.toml",
                &format!(
                    r#"
                    [storage]
                    database_path = "/tmp/peerconnect-test.db"

                    [discovery]
                    loading_delay_ms = 0

                    [directory]
                    path = "{}"
                    "#,
                    students.display()
                ),
            )?;

            let config = Config::load_from(Some(jail.directory().join("config.toml"))).unwrap();
            assert_eq!(
                config.database_path(),
                PathBuf::from("/tmp/peerconnect-test.db")
            );
            assert_eq!(config.discovery.loading_delay_ms, 0);
            assert_eq!(config.directory.path, Some(students));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[discovery]\nloading_delay_ms = 250\n")?;
            jail.set_env("PEERCONNECT_DISCOVERY__LOADING_DELAY_MS", "40");

            let config = Config::load_from(Some(jail.directory().join("config.toml"))).unwrap();
            assert_eq!(config.loading_delay(), Duration::from_millis(40));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_file_value_fails_validation() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[discovery]\nloading_delay_ms = 60001\n")?;

            let err = Config::load_from(Some(jail.directory().join("config.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_discovery_config_deserialize() {
        let json = r#"{"loading_delay_ms": 250}"#;
        let discovery: DiscoveryConfig = serde_json::from_str(json).unwrap();
        assert_eq!(discovery.loading_delay_ms, 250);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("loading_delay_ms"));
        assert!(json.contains("database_path"));
    }
}
