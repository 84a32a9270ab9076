//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}` — public, no authentication.
///
/// # Behavior
///
/// - Resolved: `302 Found` to the long URL.
/// - Unknown or deactivated code: `302 Found` to
///   `<base>/?notfound=<code>`.
/// - Internal failure: `302 Found` to `<base>/?error=server`.
///
/// The end user always lands on functioning content; no error detail ever
/// leaks through this path.
pub async fn redirect_handler(Path(code): Path<String>, State(state): State<AppState>) -> Response {
    match state.resolver_service.resolve(&code).await {
        Ok(long_url) => found(&long_url),
        Err(AppError::NotFound { .. }) => {
            found(&format!("{}/?notfound={}", state.base_url(), code))
        }
        Err(e) => {
            error!(code, error = %e, "redirect resolution failed");
            found(&format!("{}/?error=server", state.base_url()))
        }
    }
}

/// A plain `302 Found` — axum's `Redirect` helpers only offer 303/307/308.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
