//! Configuration types.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default plan file location, relative to the working directory.
pub const DEFAULT_PLANS_FILE: &str = "plans.json";

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Where plans are persisted.
    pub plans_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            plans_file: PathBuf::from(DEFAULT_PLANS_FILE),
        }
    }
}

impl ServerConfig {
    /// Read server settings from `PLANNER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = std::env::var("PLANNER_HOST").unwrap_or(defaults.host);

        let port = match std::env::var("PLANNER_PORT") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "PLANNER_PORT".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            Err(_) => defaults.port,
        };

        let plans_file = std::env::var("PLANNER_PLANS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.plans_file);

        Ok(Self {
            host,
            port,
            plans_file,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                key: "PLANNER_HOST".to_string(),
                message: format!("{:?}: {e}", self.host),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.plans_file, PathBuf::from("plans.json"));
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn bad_host_is_invalid_value() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.bind_addr(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
