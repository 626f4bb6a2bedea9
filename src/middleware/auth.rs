//! Bearer token authentication.
//!
//! [`authenticate`] walks each request through a fixed sequence and stops at
//! the first failure:
//!
//! | Step | Failure | Status |
//! |---|---|---|
//! | read `Authorization` | `no authorization header` | 401 |
//! | split into `Bearer <token>` | `malformed authorization header` | 401 |
//! | verify token | the token error | 401 |
//! | read subject | `missing subject in token` | 401 |
//! | load principal | `cannot resolve principal` | 401 |
//! | check active flag | `principal inactive` | 403 |
//!
//! On success the [`Principal`] is stored in the request extensions, where
//! handlers read it back through [`AuthPrincipal`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use gatehouse_core::AppError;
use gatehouse_models::Principal;
use tracing::{debug, warn};

use crate::state::AppState;

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = resolve_principal(&state, req.headers()).await?;
    debug!(principal.id = %principal.id, principal.role = %principal.role, "Authenticated");
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Runs the authentication steps against a set of request headers.
pub async fn resolve_principal(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, AppError> {
    let token = bearer_token(headers)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        debug!(error = %e, "Token rejected");
        AppError::from(e)
    })?;

    if claims.sub.is_empty() {
        return Err(AppError::unauthorized("missing subject in token"));
    }

    let record = match state.repository.find_by_id(&claims.sub).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!(subject = %claims.sub, "Token subject not found");
            return Err(AppError::unauthorized("cannot resolve principal"));
        }
        Err(e) => {
            warn!(subject = %claims.sub, error = %e, "Principal lookup failed");
            return Err(AppError::unauthorized("cannot resolve principal"));
        }
    };

    let principal = Principal::from(record);
    if !principal.active {
        return Err(AppError::forbidden("principal inactive"));
    }
    Ok(principal)
}

/// Extracts `<token>` from `Authorization: Bearer <token>`. The scheme is
/// matched case-insensitively and exactly two fields must be present.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("no authorization header"))?;

    let value = value
        .to_str()
        .map_err(|_| AppError::unauthorized("malformed authorization header"))?;
    if value.trim().is_empty() {
        return Err(AppError::unauthorized("no authorization header"));
    }

    let mut fields = value.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AppError::unauthorized("malformed authorization header")),
    }
}

/// The principal attached by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthPrincipal)
            .ok_or_else(|| AppError::internal_error("route is missing the authenticate layer"))
    }
}
