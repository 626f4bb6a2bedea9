use axum::{Router, routing::get};

use crate::modules::health::controller::{health, hello};
use crate::state::AppState;

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(hello))
        .route("/healthz", get(health))
}
