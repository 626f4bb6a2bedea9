//! Feature modules. Each one follows the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: business logic
//! - `router.rs`: Axum router configuration

pub mod auth;
pub mod health;
pub mod users;
