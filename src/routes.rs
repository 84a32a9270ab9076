//! Top-level router: the explicit middleware pipeline.
//!
//! # Route Structure
//!
//! - `GET /{code}`  - short link redirect (public)
//! - `GET /health`  - component health check (public)
//! - `/api/*`       - owner link management (bearer subject required)
//!
//! # Pipeline
//!
//! Stage order is a contract, spelled out here rather than implied by
//! registration order elsewhere. Outermost first:
//!
//! 1. **trace**        - request span, status + latency logging
//! 2. **cors**         - frontend origin only, preflight included
//! 3. **security**     - nosniff / frame-deny response headers
//! 4. **global limit** - 100 requests/min per client, all operations
//! 5. **class limit**  - per-operation fixed windows (attached per route)
//! 6. **body limit**   - 10 kB JSON cap (API routes only)
//! 7. **auth**         - bearer subject extraction (API routes only)
//! 8. handler

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::rate_limit::{self, RateLimiters};
use crate::api::middleware::{auth, security_headers, tracing};
use crate::state::AppState;
use axum::handler::Handler;

/// Request bodies are small JSON documents; anything bigger is abuse.
const BODY_LIMIT_BYTES: usize = 10 * 1024;

/// CORS restricted to the frontend at the public base address. An
/// unparseable origin leaves the default (deny cross-origin) in place.
fn cors_layer(public_base: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match public_base.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => cors,
    }
}

/// Constructs the inner application router.
///
/// Split from [`app_router`] so tests can serve it directly without the
/// path-normalization wrapper.
pub fn router(state: AppState, limiters: &RateLimiters) -> Router {
    let api_router = api::routes::protected_routes(limiters)
        .route_layer(middleware::from_fn(auth::layer))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    let cors = cors_layer(state.base_url());

    Router::new()
        .route(
            "/{code}",
            get(redirect_handler.layer(middleware::from_fn_with_state(
                limiters.redirect.clone(),
                rate_limit::enforce,
            ))),
        )
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .fallback(fallback_handler)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            limiters.global.clone(),
            rate_limit::enforce,
        ))
        .layer(middleware::from_fn(security_headers::layer))
        .layer(cors)
        .layer(tracing::layer())
}

/// Constructs the full application router with all routes and middleware.
pub fn app_router(state: AppState, limiters: &RateLimiters) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, limiters))
}

/// JSON 404 for unmatched routes.
async fn fallback_handler() -> crate::error::AppError {
    crate::error::AppError::not_found("Route not found", serde_json::json!({}))
}
