use axum::{Json, extract::State, http::StatusCode};
use gatehouse_db::HealthReport;
use gatehouse_models::MessageResponse;

use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = MessageResponse)),
    tag = "Health"
)]
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello, World!"))
}

/// Repository health. 503 when the repository is down.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Repository reachable", body = HealthReport),
        (status = 503, description = "Repository unreachable", body = HealthReport)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.repository.health().await;
    let status = if report.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
