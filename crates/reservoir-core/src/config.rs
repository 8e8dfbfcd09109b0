//! Configuration loading and typed config structures.
//!
//! The host reads `reservoir.yaml` once at startup. Every field has a
//! default, so an empty file (or no file at all) yields a working
//! configuration. Settings are resolved into plain values here; the
//! engine never consults optional or dynamically-typed settings again.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable that overrides [`StorageConfig::path`].
pub const STATE_PATH_ENV: &str = "RESERVOIR_STATE_PATH";

/// Lowest accepted `base_yield_per_turn`.
pub const MIN_BASE_YIELD: u32 = 1;

/// Highest accepted `base_yield_per_turn`.
pub const MAX_BASE_YIELD: u32 = 100;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReservoirConfig {
    /// Engine behaviour.
    #[serde(default)]
    pub settings: Settings,

    /// Where state is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReservoirConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `RESERVOIR_STATE_PATH` overrides `storage.path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.settings = config.settings.resolved();
        config.storage.apply_env_overrides();
        Ok(config)
    }
}

/// How much a character produces per turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionMode {
    /// Fixed per-level table (1 at level 1 up to 18 at level 10).
    #[default]
    LevelTable,
    /// `base_yield_per_turn`, plus 5% per level above 1.
    Scaled,
}

/// Engine settings, resolved once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Whether warnings and status messages are pushed to the notifier.
    #[serde(default = "default_true")]
    pub enable_notifications: bool,

    /// Production curve selector.
    #[serde(default)]
    pub production_mode: ProductionMode,

    /// Base amount per turn for [`ProductionMode::Scaled`] (1--100).
    #[serde(default = "default_base_yield_per_turn")]
    pub base_yield_per_turn: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_notifications: true,
            production_mode: ProductionMode::default(),
            base_yield_per_turn: default_base_yield_per_turn(),
        }
    }
}

impl Settings {
    /// Clamp out-of-range values into their accepted ranges.
    #[must_use]
    pub fn resolved(self) -> Self {
        Self {
            base_yield_per_turn: self.base_yield_per_turn.clamp(MIN_BASE_YIELD, MAX_BASE_YIELD),
            ..self
        }
    }
}

/// Persistence location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding every character and the shared pools.
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

impl StorageConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(STATE_PATH_ENV)
            && !path.trim().is_empty()
        {
            self.path = PathBuf::from(path);
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_base_yield_per_turn() -> u32 {
    10
}

fn default_state_path() -> PathBuf {
    PathBuf::from("reservoir-state.json")
}

fn default_log_level() -> String {
    String::from("info")
}
