//! HTTP server configuration.
//!
//! - `SERVER_HOST` (default: `0.0.0.0`)
//! - `SERVER_PORT` (default: `8000`)
//! - `REQUEST_TIMEOUT_MS`: deadline applied to every request (default: `150`)

use std::time::Duration;

use crate::{ConfigError, parse_var, var};

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 150;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: var("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_var("SERVER_PORT", defaults.port)?,
            request_timeout: Duration::from_millis(parse_var(
                "REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )?),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid {
                name: "SERVER_PORT",
                reason: "must be between 1 and 65535".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_MS",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "0.0.0.0:8000");
        assert_eq!(config.request_timeout, Duration::from_millis(150));
        assert!(config.validate().is_ok());
    }
}
