//! # Gatehouse Config
//!
//! Configuration types for the Gatehouse gateway.
//!
//! Every value is read from the environment once at startup and injected into
//! the components that need it; nothing is kept in process-wide globals.
//!
//! - [`cors`]: allowed origins for cross-origin requests
//! - [`database`]: Postgres connection settings
//! - [`jwt`]: session token signing settings
//! - [`password`]: password hashing cost
//! - [`server`]: bind address and per-request deadline
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_config::Config;
//!
//! dotenvy::dotenv().ok();
//! let config = Config::from_env()?;
//! println!("listening on {}", config.server.address());
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod password;
pub mod server;

use std::env;
use std::str::FromStr;

use thiserror::Error;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use password::PasswordConfig;
pub use server::ServerConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Full application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub password: PasswordConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            cors: CorsConfig::from_env(),
            password: PasswordConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.jwt.validate()?;
        self.cors.validate()?;
        self.password.validate()?;
        Ok(())
    }
}

/// Reads a variable, treating an empty value as unset.
pub(crate) fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parses a variable, falling back to `default` when unset. A value that is
/// present but unparsable is an error rather than a silent default.
pub(crate) fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match var(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: format!("cannot parse {raw:?}"),
        }),
        None => Ok(default),
    }
}
