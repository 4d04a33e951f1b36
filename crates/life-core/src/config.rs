//! Configuration loading and typed config structures for the Torus Life
//! server.
//!
//! Configuration lives in an optional `life-config.yaml`. Every field has a
//! default, so an empty file (or no file) is a valid configuration. After
//! parsing, a small set of environment variables may override values and the
//! result is validated.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::board::MAX_BOARD_SIZE;
use crate::broadcast::DEFAULT_BROADCAST_CAPACITY;

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

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {value}")]
    Env {
        /// Name of the environment variable.
        var: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A value is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LifeConfig {
    /// Board and tick settings.
    #[serde(default)]
    pub world: WorldConfig,

    /// Generation fan-out settings.
    #[serde(default)]
    pub broadcast: BroadcastConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LifeConfig {
    /// Load configuration from a YAML file, apply environment overrides and
    /// validate.
    ///
    /// Environment variables override YAML values:
    /// - `LIFE_HOST` overrides `server.host`
    /// - `LIFE_PORT` overrides `server.port`
    /// - `LIFE_TICK_INTERVAL_MS` overrides `world.tick_interval_ms`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, and
    /// [`ConfigError::Env`] or [`ConfigError::Invalid`] for bad values.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string and validate it.
    ///
    /// No environment overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Override values from `LIFE_*` environment variables when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if a numeric variable does not parse.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Override values using `lookup` in place of the process environment.
    ///
    /// `lookup` receives a variable name such as `LIFE_PORT` and returns its
    /// value, or `None` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if a numeric variable does not parse.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("LIFE_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("LIFE_PORT") {
            self.server.port = parse_env("LIFE_PORT", val)?;
        }
        if let Some(val) = lookup("LIFE_TICK_INTERVAL_MS") {
            self.world.tick_interval_ms = parse_env("LIFE_TICK_INTERVAL_MS", val)?;
        }
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.size == 0 {
            return Err(ConfigError::Invalid {
                reason: "world.size must be at least 1".to_owned(),
            });
        }
        if self.world.size > MAX_BOARD_SIZE {
            return Err(ConfigError::Invalid {
                reason: format!("world.size must be at most {MAX_BOARD_SIZE}"),
            });
        }
        if self.world.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "world.tick_interval_ms must be at least 1".to_owned(),
            });
        }
        if self.broadcast.capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "broadcast.capacity must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Board and tick settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Board side length.
    #[serde(default = "default_board_size")]
    pub size: usize,

    /// Milliseconds between simulation ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Seed for board reseeding. `None` seeds from the operating system.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl WorldConfig {
    /// The tick interval as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: default_board_size(),
            tick_interval_ms: default_tick_interval_ms(),
            seed: None,
        }
    }
}

/// Generation fan-out settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BroadcastConfig {
    /// Generations a viewer may fall behind before the oldest are dropped.
    #[serde(default = "default_broadcast_capacity")]
    pub capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            capacity: default_broadcast_capacity(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_parse_err| ConfigError::Env { var, value })
}

const fn default_board_size() -> usize {
    75
}

const fn default_tick_interval_ms() -> u64 {
    200
}

const fn default_broadcast_capacity() -> usize {
    DEFAULT_BROADCAST_CAPACITY
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    String::from("info")
}
