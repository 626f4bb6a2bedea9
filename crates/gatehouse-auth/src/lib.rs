//! # Gatehouse Auth
//!
//! Issues and verifies the signed session tokens carried in
//! `Authorization: Bearer <token>`.
//!
//! ```ignore
//! use gatehouse_auth::TokenCodec;
//!
//! let codec = TokenCodec::new(&config.jwt);
//! let token = codec.issue(&principal)?;
//! let claims = codec.verify(&token)?;
//! assert_eq!(claims.sub, principal.id);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{TokenCodec, TokenError};
