//! # Gatehouse Core
//!
//! Core types, errors, and utilities for the Gatehouse gateway.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page request parsing and page arithmetic for listings
//! - [`password`]: Password hashing and verification (bcrypt)
//! - [`serde`]: Custom serde deserialization helpers
//! - [`validation`]: Email shape and password strength rules
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_core::errors::AppError;
//! use gatehouse_core::pagination::PageQuery;
//! use gatehouse_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("user not found"));
//!
//! let hash = hash_password("Secur3!pass", 10)?;
//!
//! let page = PageQuery::default().to_page_request();
//! assert_eq!(page.limit, 10);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;
pub mod validation;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PageQuery, PageRequest, PageResult, total_pages};
pub use password::{hash_password, spawn_hash_password, spawn_verify_password, verify_password};
