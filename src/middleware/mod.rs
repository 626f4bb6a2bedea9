//! Request pipeline middleware.
//!
//! Order for a protected route, outermost first:
//!
//! ```text
//! logging -> deadline -> CORS -> authenticate -> require_role -> handler
//! ```
//!
//! - [`deadline`]: bounds the whole request by the configured timeout
//! - [`auth`]: resolves the bearer token into a [`gatehouse_models::Principal`]
//! - [`role`]: rejects principals without the required role

pub mod auth;
pub mod deadline;
pub mod role;
