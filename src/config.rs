use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::sync::{StoreKey, DEFAULT_KEY_PREFIX};

/// Where the game lives in the shared space.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Deployment instance identifier, e.g. the hosting page URL. Query
    /// parameters are stripped when deriving the key.
    pub instance: String,
    pub key_prefix: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            instance: "local".to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn store_key(&self) -> StoreKey {
        StoreKey::for_instance(&self.key_prefix, &self.instance)
    }
}

/// Terminal front-end settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Event poll interval in milliseconds.
    pub tick_ms: u64,
    /// Start with echoes held back instead of delivered every tick.
    pub hold_echoes: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            tick_ms: 100,
            hold_echoes: false,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` overrides it.
    pub filter: String,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
            file: PathBuf::from("connect4.log"),
        }
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// The file was missing; every value is a default.
    Defaults,
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sync: SyncConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist. Logging is usually not set up yet, so the caller reports
    /// the returned source once it is.
    pub fn load_or_default(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        if path.exists() {
            Ok((Self::load(path)?, ConfigSource::File(path.to_path_buf())))
        } else {
            Ok((Self::default(), ConfigSource::Defaults))
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.instance.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sync.instance must not be empty".into(),
            ));
        }
        if self.sync.key_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "sync.key_prefix must not be empty".into(),
            ));
        }
        if self.ui.tick_ms == 0 {
            return Err(ConfigError::Validation("ui.tick_ms must be > 0".into()));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.filter must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
