use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use gatehouse_core::AppError;
use tokio::time::{Instant, timeout_at};
use tracing::warn;

use crate::state::AppState;

/// The instant by which the current request must have produced a response.
///
/// Extracting it never fails; outside [`enforce_deadline`] it holds `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestDeadline(pub Option<Instant>);

impl<S> FromRequestParts<S> for RequestDeadline
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestDeadline>()
            .copied()
            .unwrap_or_default())
    }
}

/// Runs the rest of the chain under `REQUEST_TIMEOUT_MS`. When the deadline
/// elapses the inner future is dropped, which cancels any outstanding
/// repository calls, and the client gets a 504.
pub async fn enforce_deadline(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let deadline = Instant::now() + state.server_config.request_timeout;
    req.extensions_mut().insert(RequestDeadline(Some(deadline)));

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match timeout_at(deadline, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(
                method = %method,
                path = %path,
                timeout_ms = %state.server_config.request_timeout.as_millis(),
                "Request deadline elapsed"
            );
            AppError::timeout().into_response()
        }
    }
}
