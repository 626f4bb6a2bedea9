use gatehouse_models::Role;
use serde::{Deserialize, Serialize};

/// Payload signed inside a session token.
///
/// Wire names follow the `{userId, userEmail?, userRole?, iat, exp, iss}`
/// schema. A token without `userId` still decodes, with an empty subject, so
/// the caller can reject it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId", default)]
    pub sub: String,
    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "userRole", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub iat: i64,
    pub exp: i64,
    #[serde(default)]
    pub iss: String,
}
