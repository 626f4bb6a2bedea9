use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::authenticate;
use crate::modules::auth::controller::{get_me, login_user, register_user};
use crate::state::AppState;

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route(
            "/me",
            get(get_me).route_layer(middleware::from_fn_with_state(state, authenticate)),
        )
}
