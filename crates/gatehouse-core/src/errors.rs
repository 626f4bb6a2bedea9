//! Application error type with HTTP response conversion.
//!
//! Every failure that crosses the handler boundary is an [`AppError`]: an
//! HTTP status paired with an [`anyhow::Error`]. Lower layers keep their own
//! typed errors and classify them into an `AppError` through explicit `From`
//! impls, so a repository or token failure is never surfaced verbatim.
//!
//! | Constructor | Status |
//! |---|---|
//! | [`AppError::bad_request`] | 400 |
//! | [`AppError::unauthorized`] | 401 |
//! | [`AppError::forbidden`] | 403 |
//! | [`AppError::not_found`] | 404 |
//! | [`AppError::conflict`] | 409 |
//! | [`AppError::internal`] | 500 |
//! | [`AppError::timeout`] | 504 |
//!
//! Server-side failures (5xx) are logged with their full cause chain and
//! rendered with a generic message.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow!(message.into()))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message.into()))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, anyhow!(message.into()))
    }

    /// The request deadline elapsed before a response was produced.
    pub fn timeout() -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, anyhow!("request timed out"))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    /// The message a client is allowed to see.
    pub fn public_message(&self) -> String {
        match self.status {
            StatusCode::GATEWAY_TIMEOUT => "request timed out".to_string(),
            status if status.is_server_error() => "internal server error".to_string(),
            _ => self.error.to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
        }

        let body = Json(json!({
            "error": self.public_message()
        }));

        (self.status, body).into_response()
    }
}
