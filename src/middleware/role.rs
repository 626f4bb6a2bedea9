//! Role gate. Must be layered inside [`authenticate`](super::auth::authenticate),
//! whose principal it inspects; it performs no I/O of its own.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use gatehouse_core::AppError;
use gatehouse_models::{Principal, Role};

pub fn check_role(principal: &Principal, required: Role) -> Result<(), AppError> {
    if principal.role != required {
        return Err(AppError::forbidden("insufficient role"));
    }
    Ok(())
}

/// Middleware for `from_fn_with_state(role, require_role)`.
pub async fn require_role(
    State(required): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or_else(|| AppError::internal_error("role check ran before authentication"))?;
    check_role(principal, required)?;
    Ok(next.run(req).await)
}

pub async fn require_admin(req: Request, next: Next) -> Response {
    match require_role(State(Role::Admin), req, next).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
