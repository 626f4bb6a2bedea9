//! User domain models and DTOs.

use std::fmt;

use chrono::{DateTime, Utc};
use gatehouse_core::serde::deserialize_trimmed;
use gatehouse_core::validation::{validate_email_shape, validate_password_strength};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user row as stored by the identity repository.
///
/// Carries the password hash, so it never leaves the service layer; handlers
/// respond with [`UserView`].
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The authenticated identity attached to one request.
///
/// Rebuilt from a fresh repository lookup on every request and never shared
/// across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&UserRecord> for Principal {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            email: record.email.clone(),
            role: record.role,
            active: record.is_active,
        }
    }
}

impl From<UserRecord> for Principal {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            role: record.role,
            active: record.is_active,
        }
    }
}

/// Public representation of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserView {
    #[schema(example = "1f0c7a52-6a9e-4d3e-8f55-2a3c1b9d7e10")]
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub is_active: bool,
    pub role: Role,
}

impl From<&UserRecord> for UserView {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            email: record.email.clone(),
            is_active: record.is_active,
            role: record.role,
        }
    }
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            is_active: record.is_active,
            role: record.role,
        }
    }
}

impl From<&Principal> for UserView {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.clone(),
            email: principal.email.clone(),
            is_active: principal.active,
            role: principal.role,
        }
    }
}

/// A user about to be inserted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

/// Predicate shared by the select and count halves of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring of the email; empty matches everything.
    pub query: String,
    pub include_inactive: bool,
}

impl UserFilter {
    pub fn new(query: impl Into<String>, include_inactive: bool) -> Self {
        Self {
            query: query.into(),
            include_inactive,
        }
    }

    /// In-process evaluation of the predicate.
    pub fn matches(&self, email: &str, is_active: bool) -> bool {
        if !self.include_inactive && !is_active {
            return false;
        }
        self.query.is_empty() || email.to_lowercase().contains(&self.query.to_lowercase())
    }

    /// `ILIKE` pattern with the wildcard characters in the query escaped.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.query.len() + 2);
        pattern.push('%');
        for c in self.query.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateEmailRequest {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(custom(function = "validate_email_shape"))]
    #[schema(example = "new.address@example.com")]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    /// Missing and explicit `false` are different requests.
    #[serde(default)]
    #[validate(required(message = "is_active is required in request body"))]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[schema(example = "Passw0rd!")]
    pub old_password: String,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "N3w-Passw0rd!")]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One page of the user listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserView>,
    pub total_page: i64,
    pub per_page: i64,
    pub page_number: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        let role: Role = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(role, Role::User);
        assert!(serde_json::from_str::<Role>(r#""root""#).is_err());
    }

    #[test]
    fn test_filter_matches() {
        let filter = UserFilter::new("ADA", false);
        assert!(filter.matches("ada@example.com", true));
        assert!(!filter.matches("ada@example.com", false));
        assert!(!filter.matches("bob@example.com", true));

        let all = UserFilter::new("", true);
        assert!(all.matches("bob@example.com", false));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(UserFilter::new("a_b%", false).like_pattern(), r"%a\_b\%%");
        assert_eq!(UserFilter::default().like_pattern(), "%%");
    }

    #[test]
    fn test_status_request_distinguishes_missing() {
        let missing: UpdateStatusRequest = serde_json::from_str("{}").unwrap();
        let err = missing.validate().unwrap_err();
        assert!(err.field_errors().contains_key("is_active"));

        let explicit: UpdateStatusRequest =
            serde_json::from_str(r#"{"is_active":false}"#).unwrap();
        assert!(explicit.validate().is_ok());
        assert_eq!(explicit.is_active, Some(false));
    }

    #[test]
    fn test_list_response_camel_case() {
        let body = UserListResponse {
            users: vec![],
            total_page: 3,
            per_page: 10,
            page_number: 1,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["totalPage"], 3);
        assert_eq!(json["perPage"], 10);
        assert_eq!(json["pageNumber"], 1);
    }
}
