//! HMAC-signed session tokens.
//!
//! Verification order:
//!
//! 1. the header must parse and declare an HMAC algorithm (`HS256`, `HS384`
//!    or `HS512`); anything else, including `none`, is a signature failure
//! 2. the signature is recomputed with the configured secret
//! 3. `exp` must be after `iat`
//! 4. `exp` must not have elapsed
//! 5. `iss` must equal the configured issuer
//!
//! Claims are never returned from a token that failed step 2.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use thiserror::Error;

use gatehouse_config::JwtConfig;
use gatehouse_config::jwt::MAX_EXPIRATION_SECS;
use gatehouse_core::AppError;
use gatehouse_models::Principal;

use crate::claims::Claims;

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("cannot sign token: {0}")]
    Signing(String),
    #[error("malformed token")]
    Malformed,
    #[error("{0}")]
    Signature(&'static str),
    #[error("token expired")]
    Expired,
    #[error("token issuer mismatch")]
    Issuer,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => AppError::internal(err),
            other => AppError::unauthorized(other.to_string()),
        }
    }
}

/// Signs and verifies session tokens with one symmetric secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
    has_secret: bool,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer.clone(),
            ttl: ttl_from_secs(config.expiration_secs),
            has_secret: !secret.is_empty(),
        }
    }

    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, TokenError> {
        if !self.has_secret {
            return Err(TokenError::Signing("signing secret is empty".to_string()));
        }

        let iat = now.timestamp();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?
            .timestamp();
        let claims = Claims {
            sub: principal.id.clone(),
            email: Some(principal.email.clone()),
            role: Some(principal.role),
            iat,
            exp,
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let header = match decode_header(token) {
            Ok(header) => header,
            Err(_) if declares_algorithm(token) => {
                return Err(TokenError::Signature("unexpected signing method"));
            }
            Err(_) => return Err(TokenError::Malformed),
        };
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            return Err(TokenError::Signature("unexpected signing method"));
        }
        if !self.has_secret {
            return Err(TokenError::Signature("signature mismatch"));
        }

        let mut validation = Validation::new(header.alg);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::Signature("signature mismatch"),
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::Signature("unexpected signing method")
                }
                _ => TokenError::Malformed,
            })?;

        if claims.exp <= claims.iat {
            return Err(TokenError::Malformed);
        }
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        if claims.iss != self.issuer {
            return Err(TokenError::Issuer);
        }
        Ok(claims)
    }
}

/// Lifetimes beyond [`MAX_EXPIRATION_SECS`] are clamped; `JwtConfig::validate`
/// rejects them before a codec is built.
fn ttl_from_secs(secs: i64) -> Duration {
    Duration::try_seconds(secs.clamp(0, MAX_EXPIRATION_SECS)).unwrap_or_else(Duration::zero)
}

/// True when the first segment is JSON naming some `alg`, even one the
/// decoder does not know (such as `none`).
fn declares_algorithm(token: &str) -> bool {
    let Some(segment) = token.split('.').next() else {
        return false;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(segment) else {
        return false;
    };
    serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|header| header.get("alg").map(|alg| alg.is_string()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_models::Role;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            expiration_secs: 3600,
            issuer: "gatehouse".to_string(),
        }
    }

    fn principal() -> Principal {
        Principal {
            id: "u1".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::User,
            active: true,
        }
    }

    #[test]
    fn test_round_trip() {
        let codec = TokenCodec::new(&config("test-secret"));
        let token = codec.issue(&principal()).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, Some(Role::User));
        assert_eq!(claims.iss, "gatehouse");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_empty_secret_cannot_sign() {
        let codec = TokenCodec::new(&config(""));
        assert!(matches!(
            codec.issue(&principal()),
            Err(TokenError::Signing(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_signature_error() {
        let token = TokenCodec::new(&config("secret-a"))
            .issue(&principal())
            .unwrap();
        let err = TokenCodec::new(&config("secret-b"))
            .verify(&token)
            .unwrap_err();
        assert_eq!(err, TokenError::Signature("signature mismatch"));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = TokenCodec::new(&config("test-secret"));
        assert_eq!(codec.verify("not-a-token").unwrap_err(), TokenError::Malformed);
        assert_eq!(codec.verify("").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_issuer_mismatch() {
        let mut other = config("test-secret");
        other.issuer = "someone-else".to_string();
        let token = TokenCodec::new(&other).issue(&principal()).unwrap();
        let err = TokenCodec::new(&config("test-secret"))
            .verify(&token)
            .unwrap_err();
        assert_eq!(err, TokenError::Issuer);
    }

    #[test]
    fn test_token_error_status_mapping() {
        assert_eq!(AppError::from(TokenError::Expired).status.as_u16(), 401);
        assert_eq!(
            AppError::from(TokenError::Signing("x".to_string())).status.as_u16(),
            500
        );
    }

    #[test]
    fn test_out_of_range_lifetime_does_not_panic() {
        let mut huge = config("test-secret");
        huge.expiration_secs = i64::MAX / 10;
        let codec = TokenCodec::new(&huge);
        assert_eq!(codec.ttl.num_seconds(), MAX_EXPIRATION_SECS);

        let claims = codec.verify(&codec.issue(&principal()).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, MAX_EXPIRATION_SECS);
    }

    #[test]
    fn test_expiry_overflow_is_signing_error() {
        let codec = TokenCodec::new(&config("test-secret"));
        let err = codec.issue_at(&principal(), DateTime::<Utc>::MAX_UTC).unwrap_err();
        assert!(matches!(err, TokenError::Signing(_)));
    }
}
