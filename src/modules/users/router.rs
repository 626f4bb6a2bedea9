use axum::{
    Router, middleware,
    routing::{delete, get, patch},
};

use crate::middleware::auth::authenticate;
use crate::middleware::role::require_admin;
use crate::modules::users::controller::{
    change_password, delete_user, get_user, list_users, update_user, update_user_status,
};
use crate::state::AppState;

/// `GET` routes are public; every mutation is authenticated, and `DELETE`
/// additionally requires the admin role.
pub fn init_users_router(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, authenticate);

    Router::new()
        .route("/all", get(list_users))
        .route(
            "/{id}",
            get(get_user)
                .merge(patch(update_user).route_layer(auth.clone()))
                .merge(
                    delete(delete_user)
                        .route_layer(middleware::from_fn(require_admin))
                        .route_layer(auth.clone()),
                ),
        )
        .route(
            "/{id}/status",
            patch(update_user_status).route_layer(auth.clone()),
        )
        .route("/{id}/password", patch(change_password).route_layer(auth))
}
