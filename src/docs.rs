use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use gatehouse_db::{HealthReport, HealthStatus};
use gatehouse_models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest, Role,
    UpdateEmailRequest, UpdateStatusRequest, UserListResponse, UserView,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::hello,
        crate::modules::health::controller::health,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::update_user_status,
        crate::modules::users::controller::change_password,
        crate::modules::users::controller::delete_user,
    ),
    components(
        schemas(
            Role,
            UserView,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UpdateEmailRequest,
            UpdateStatusRequest,
            ChangePasswordRequest,
            UserListResponse,
            MessageResponse,
            HealthReport,
            HealthStatus,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and repository health"),
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Users", description = "User lookup, listing and management")
    ),
    info(
        title = "Gatehouse API",
        version = "0.1.0",
        description = "Authentication and authorization gateway with bearer session tokens.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
