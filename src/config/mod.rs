use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read config file '{path}': {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse config file '{path}': {source}")]
  Parse {
    path: String,
    #[source]
    source: toml::de::Error,
  },
  #[error("invalid config: {0}")]
  Invalid(String),
}

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<String>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// Service configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
  /// HTTP listening address
  #[serde(default = "default_server_addr")]
  pub server_addr: String,

  /// Upper bound on draining in-flight requests at shutdown
  #[serde(default = "default_shutdown_timeout_secs")]
  pub shutdown_timeout_secs: u64,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,
}

fn default_server_addr() -> String {
  "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout_secs() -> u64 {
  10
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server_addr: default_server_addr(),
      shutdown_timeout_secs: default_shutdown_timeout_secs(),
      log: LogConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: &str) -> Result<Self, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_string(),
      source,
    })?;

    let config = Self::from_toml(&config_str).map_err(|source| ConfigError::Parse {
      path: path.to_string(),
      source,
    })?;

    config.validate()?;
    Ok(config)
  }

  fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(s)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.server_addr.trim().is_empty() {
      return Err(ConfigError::Invalid("server_addr must not be empty".to_string()));
    }
    if self.shutdown_timeout_secs == 0 {
      return Err(ConfigError::Invalid(
        "shutdown_timeout_secs must be greater than zero".to_string(),
      ));
    }
    Ok(())
  }

  pub fn shutdown_timeout(&self) -> Duration {
    Duration::from_secs(self.shutdown_timeout_secs)
  }
}
