//! Owner identity extraction from the Authorization header.
//!
//! Identity verification is delegated to the external identity provider at
//! the edge; by the time a request reaches this service the bearer token is
//! the already-verified subject. This middleware only extracts it and makes
//! it available to handlers as [`OwnerId`].

use axum::{
    extract::{FromRequestParts, Request},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::error::AppError;

/// The authenticated caller's subject, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

/// Requires a bearer subject on the request.
///
/// # Errors
///
/// Returns `401 Unauthorized` when the Authorization header is missing,
/// malformed, or carries an empty subject.
pub async fn layer(req: Request, next: Next) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(subject) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    if subject.trim().is_empty() {
        return Err(AppError::unauthorized(
            "Unauthorized",
            serde_json::json!({ "reason": "Empty bearer subject" }),
        ));
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(OwnerId(subject));

    Ok(next.run(req).await)
}
