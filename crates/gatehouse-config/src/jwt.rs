//! Session token signing configuration.
//!
//! - `JWT_SECRET`: HMAC secret (required, non-empty)
//! - `JWT_EXPIRATION_SECS`: token lifetime in seconds (default: 86400, 24 hours,
//!   at most ten years)
//! - `JWT_ISSUER`: issuer claim written into and required from every token
//!   (default: `gatehouse`)

use crate::{ConfigError, parse_var, var};

pub const DEFAULT_EXPIRATION_SECS: i64 = 24 * 60 * 60;
pub const MAX_EXPIRATION_SECS: i64 = 10 * 365 * 24 * 60 * 60;
pub const DEFAULT_ISSUER: &str = "gatehouse";

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_secs: i64,
    pub issuer: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_secs", &self.expiration_secs)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            expiration_secs: parse_var("JWT_EXPIRATION_SECS", DEFAULT_EXPIRATION_SECS)?,
            issuer: var("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.expiration_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRATION_SECS",
                reason: "must be positive".to_string(),
            });
        }
        if self.expiration_secs > MAX_EXPIRATION_SECS {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRATION_SECS",
                reason: format!("must be at most {MAX_EXPIRATION_SECS}"),
            });
        }
        Ok(())
    }
}
