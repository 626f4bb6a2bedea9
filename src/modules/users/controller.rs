use axum::{
    Json,
    extract::{Path, Query, State},
};
use gatehouse_core::{AppError, PageQuery};
use gatehouse_models::{
    ChangePasswordRequest, MessageResponse, UpdateEmailRequest, UpdateStatusRequest,
    UserListResponse, UserView,
};
use tracing::instrument;

use crate::middleware::auth::AuthPrincipal;
use crate::middleware::deadline::RequestDeadline;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserView),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, AppError> {
    Ok(Json(UserService::get_user(state.repository.as_ref(), &id).await?))
}

/// List users, one page at a time
#[utoipa::path(
    get,
    path = "/users/all",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of users", body = UserListResponse),
        (status = 500, description = "Listing failed", body = ErrorResponse),
        (status = 504, description = "Request deadline elapsed", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, deadline))]
pub async fn list_users(
    State(state): State<AppState>,
    deadline: RequestDeadline,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserListResponse>, AppError> {
    let response = UserService::list_users(state.repository.as_ref(), &query, deadline.0).await?;
    Ok(Json(response))
}

/// Change one's own email
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateEmailRequest,
    responses(
        (status = 200, description = "User updated", body = UserView),
        (status = 400, description = "Invalid email", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the caller's own record", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, principal, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateEmailRequest>,
) -> Result<Json<UserView>, AppError> {
    let user =
        UserService::update_email(state.repository.as_ref(), &principal, &id, &dto.email).await?;
    Ok(Json(user))
}

/// Activate or deactivate a user
#[utoipa::path(
    patch,
    path = "/users/{id}/status",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "is_active missing", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not allowed to set this status", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, principal, dto))]
pub async fn update_user_status(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let is_active = dto.is_active.ok_or_else(|| {
        AppError::bad_request(anyhow::anyhow!("is_active is required in request body"))
    })?;
    UserService::update_status(state.repository.as_ref(), &principal, &id, is_active).await?;
    Ok(Json(MessageResponse::new("user status updated")))
}

/// Change one's own password
#[utoipa::path(
    patch,
    path = "/users/{id}/password",
    params(("id" = String, Path, description = "User id")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Weak new password", body = ErrorResponse),
        (status = 401, description = "Missing token or wrong old password", body = ErrorResponse),
        (status = 403, description = "Not the caller's own record", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, principal, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::change_password(
        state.repository.as_ref(),
        &principal,
        &id,
        dto.old_password,
        dto.new_password,
        state.password_config.bcrypt_cost,
    )
    .await?;
    Ok(Json(MessageResponse::new("password changed")))
}

/// Delete a user (admin only, never oneself)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an admin, or deleting oneself", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, principal))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::delete_user(state.repository.as_ref(), &principal, &id).await?;
    Ok(Json(MessageResponse::new("user deleted")))
}
