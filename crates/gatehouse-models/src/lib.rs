//! # Gatehouse Models
//!
//! Domain models and DTOs shared by the gateway, the repository layer and the
//! token codec.
//!
//! - [`users`]: roles, stored user records, the request-scoped [`Principal`]
//!   and the public [`UserView`]
//! - [`auth`]: register/login payloads and the `{user, token}` response

pub mod auth;
pub mod users;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use users::{
    ChangePasswordRequest, MessageResponse, NewUser, Principal, Role, UpdateEmailRequest,
    UpdateStatusRequest, UserFilter, UserListResponse, UserRecord, UserView,
};
