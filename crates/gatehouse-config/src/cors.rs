use crate::{ConfigError, var};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let allowed_origins: Vec<String> = var("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if allowed_origins.is_empty() {
            return Self::default();
        }
        Self { allowed_origins }
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.allowed_origins.iter().find(|o| !is_valid_origin(o)) {
            Some(origin) => Err(ConfigError::Invalid {
                name: "ALLOWED_ORIGINS",
                reason: format!("{origin:?} is not '*' or an http(s) origin"),
            }),
            None => Ok(()),
        }
    }
}

fn is_valid_origin(origin: &str) -> bool {
    if origin == "*" {
        return true;
    }
    let Some(rest) = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split('/').next().unwrap_or_default();
    !host.is_empty() && !host.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_is_valid() {
        let config = CorsConfig::default();
        assert!(config.allows_any());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_origin_validation() {
        assert!(is_valid_origin("http://localhost:5173"));
        assert!(is_valid_origin("https://app.example.com"));
        assert!(!is_valid_origin("localhost:5173"));
        assert!(!is_valid_origin("ftp://example.com"));
        assert!(!is_valid_origin("https://"));
    }

    #[test]
    fn test_explicit_list_does_not_allow_any() {
        let config = CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
        };
        assert!(!config.allows_any());
        assert!(config.validate().is_ok());
    }
}
