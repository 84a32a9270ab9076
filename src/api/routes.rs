//! API route configuration.
//!
//! Each operation class carries its own fixed-window limiter stage, attached
//! per handler so `POST` and `GET` on the same path meter independently.
//! Authentication is applied by the caller around the whole group — see
//! [`crate::routes::app_router`] for the full pipeline order.

use axum::{
    Router,
    handler::Handler,
    middleware,
    routing::{get, patch},
};

use crate::api::handlers::{create_link_handler, list_links_handler, update_link_handler};
use crate::api::middleware::rate_limit::{self, RateLimiters};
use crate::state::AppState;

/// Owner-facing link management routes.
///
/// # Endpoints
///
/// - `POST  /links`      - create a short link (20 / 15 min per client)
/// - `GET   /links`      - list own links (30 / min per client)
/// - `PATCH /links/{id}` - update own link (10 / min per client)
pub fn protected_routes(limiters: &RateLimiters) -> Router<AppState> {
    Router::new()
        .route(
            "/links",
            get(list_links_handler.layer(middleware::from_fn_with_state(
                limiters.list.clone(),
                rate_limit::enforce,
            )))
            .post(create_link_handler.layer(middleware::from_fn_with_state(
                limiters.create.clone(),
                rate_limit::enforce,
            ))),
        )
        .route(
            "/links/{id}",
            patch(update_link_handler.layer(middleware::from_fn_with_state(
                limiters.update.clone(),
                rate_limit::enforce,
            ))),
        )
}
