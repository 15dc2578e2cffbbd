use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub strategies: StrategiesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub connection_string: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_detection_enabled")]
    pub enabled: bool,

    #[serde(default = "default_cache_empty_outcomes")]
    pub cache_empty_outcomes: bool,

    #[serde(default = "default_excluded_tables")]
    pub excluded_tables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategiesConfig {
    #[serde(default = "default_strategy_order")]
    pub order: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_colored")]
    pub colored: bool,
}

fn default_timeout() -> u32 {
    30
}
fn default_detection_enabled() -> bool {
    true
}
fn default_cache_empty_outcomes() -> bool {
    true
}
fn default_excluded_tables() -> Vec<String> {
    vec![r"^(pg_|sqlite_|MSys)".to_string(), r"\$".to_string()]
}
fn default_strategy_order() -> Vec<String> {
    ["postgres", "mysql", "sqlite", "sqlserver", "oracle", "ansi"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_colored() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            timeout: default_timeout(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            enabled: default_detection_enabled(),
            cache_empty_outcomes: default_cache_empty_outcomes(),
            excluded_tables: default_excluded_tables(),
        }
    }
}

impl Default for StrategiesConfig {
    fn default() -> Self {
        Self {
            order: default_strategy_order(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            colored: default_colored(),
        }
    }
}

const STANDARD_CONFIG_PATHS: [&str; 2] = ["config.toml", "config/default.toml"];
const LOCAL_OVERRIDE_PATH: &str = "config/local.toml";

impl Config {
    /// Resolve the effective configuration.
    ///
    /// The base is `config_path` or the first standard file present (defaults
    /// otherwise). `config/{environment}.toml` and then `config/local.toml`
    /// are layered on top when they exist.
    pub fn load(config_path: Option<&str>, environment: Option<&str>) -> Result<Self, ConfigError> {
        let base = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => match STANDARD_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
                Some(path) => {
                    debug!("Loading config from: {}", path);
                    Self::load_from_file(path)?
                }
                None => Config::default(),
            },
        };

        let overlays = environment
            .map(|env| format!("config/{}.toml", env))
            .into_iter()
            .chain(std::iter::once(LOCAL_OVERRIDE_PATH.to_string()));

        let config = overlays.fold(base, |config, path| match Self::load_from_file(&path) {
            Ok(overlay) => {
                debug!("Applying config overlay: {}", path);
                config.merge(overlay)
            }
            Err(_) => config,
        });

        Ok(config)
    }

    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse(path.to_string(), e.to_string()))
    }

    /// Overlay `other` onto `self`. Every value in `other` wins except an
    /// absent connection string.
    pub fn merge(self, other: Self) -> Self {
        Self {
            database: DatabaseConfig {
                connection_string: other
                    .database
                    .connection_string
                    .or(self.database.connection_string),
                timeout: other.database.timeout,
            },
            detection: other.detection,
            strategies: other.strategies,
            logging: other.logging,
        }
    }

    /// Write the default configuration to `path` as TOML.
    pub fn generate_default_config(path: &str) -> Result<(), ConfigError> {
        let rendered = toml::to_string_pretty(&Config::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, rendered).map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config file '{0}': {1}")]
    Parse(String, String),

    #[error("Failed to write config file '{0}': {1}")]
    FileWrite(String, String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}
