//! Bridge configuration.
//!
//! Values come from defaults, then an optional TOML file, then command-line
//! flags and environment variables.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Invalid log filter '{0}': {1}")]
    LogFilter(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// DNS server in front of the naming backend.
    pub upstream: SocketAddr,

    /// Per-exchange timeout in milliseconds.
    pub timeout_ms: u64,

    /// Only look up onion services, never addresses.
    pub only_onion: bool,

    /// `tracing` filter directive, e.g. `warn` or `prop279_bridge=debug`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream: SocketAddr::from(([127, 0, 0, 1], 5391)),
            timeout_ms: 1500,
            only_onion: false,
            log_level: "warn".to_string(),
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub upstream: Option<SocketAddr>,
    pub timeout_ms: Option<u64>,
    pub only_onion: bool,
    pub log_level: Option<String>,
}

impl Config {
    pub fn load(path: Option<&Path>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.display().to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(upstream) = overrides.upstream {
            self.upstream = upstream;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        // A flag can only switch onion-only mode on.
        if overrides.only_onion {
            self.only_onion = true;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.upstream.port() == 0 {
            return Err(ConfigError::Validation(
                "upstream port cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
