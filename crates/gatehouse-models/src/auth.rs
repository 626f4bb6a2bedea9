//! Authentication request and response DTOs.

use gatehouse_core::serde::deserialize_trimmed;
use gatehouse_core::validation::{validate_email_shape, validate_password_strength};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::UserView;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(custom(function = "validate_email_shape"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "Passw0rd!")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Passw0rd!")]
    pub password: String,
}

/// Returned by register, login and `me`: the user plus a fresh session token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserView,
    pub token: String,
}
