//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::projects::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::Error;

/// Every key accepted by [`Config::get`] and [`Config::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "server.host",
    "server.port",
    "api.title",
    "api.version",
    "api.cors_allow_any",
    "pagination.default_size",
    "pagination.max_size",
    "logging.level",
];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// DevMasters configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub title: String,
    pub version: String,
    /// Allow cross-origin requests from any origin
    pub cors_allow_any: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_size: usize,
    pub max_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            title: "DevMasters API".to_string(),
            version: "1.0.0".to_string(),
            cors_allow_any: true,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("DEVMASTERS_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("devmasters")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or use defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::ConfigError("server.host cannot be empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(Error::ConfigError("server.port must not be 0".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.pagination.max_size) {
            return Err(Error::ConfigError(format!(
                "pagination.max_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if !(1..=self.pagination.max_size).contains(&self.pagination.default_size) {
            return Err(Error::ConfigError(format!(
                "pagination.default_size must be between 1 and pagination.max_size ({})",
                self.pagination.max_size
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::ConfigError(format!(
                "logging.level must be one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "server.host" => Ok(self.server.host.clone()),
            "server.port" => Ok(self.server.port.to_string()),
            "api.title" => Ok(self.api.title.clone()),
            "api.version" => Ok(self.api.version.clone()),
            "api.cors_allow_any" => Ok(self.api.cors_allow_any.to_string()),
            "pagination.default_size" => Ok(self.pagination.default_size.to_string()),
            "pagination.max_size" => Ok(self.pagination.max_size.to_string()),
            "logging.level" => Ok(self.logging.level.clone()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a configuration value by key
    ///
    /// The whole configuration is validated after the change; on failure
    /// the previous value is kept.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut next = self.clone();
        match key {
            "server.host" => next.server.host = value.trim().to_string(),
            "server.port" => {
                next.server.port = value
                    .parse()
                    .with_context(|| format!("Invalid port value: {}", value))?;
            }
            "api.title" => next.api.title = value.to_string(),
            "api.version" => next.api.version = value.to_string(),
            "api.cors_allow_any" => {
                next.api.cors_allow_any = value
                    .parse()
                    .with_context(|| format!("Invalid boolean value: {}", value))?;
            }
            "pagination.default_size" => {
                next.pagination.default_size = value
                    .parse()
                    .with_context(|| format!("Invalid page size: {}", value))?;
            }
            "pagination.max_size" => {
                next.pagination.max_size = value
                    .parse()
                    .with_context(|| format!("Invalid page size: {}", value))?;
            }
            "logging.level" => next.logging.level = value.trim().to_lowercase(),
            _ => return Err(unknown_key(key)),
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// All keys with their current values, in display order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!(
        "Unknown configuration key: {}. Use `devmasters config list` to see available keys.",
        key
    )
}
