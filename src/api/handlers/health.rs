//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Database ping deadline; a hung pool should not hang the health check.
const DB_PING_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

/// Reports service health with per-component checks.
///
/// # Endpoint
///
/// `GET /health` — public.
///
/// # Response Codes
///
/// - **200 OK**: database, cache and click queue all healthy
/// - **503 Service Unavailable**: any component degraded
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let cache_check = check_cache(&state).await;
    let queue_check = check_click_queue(&state);

    let all_healthy = db_check.is_ok() && cache_check.is_ok() && queue_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            cache: cache_check,
            click_queue: queue_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    let ping = sqlx::query("SELECT 1").execute(&state.db);

    match tokio::time::timeout(DB_PING_TIMEOUT, ping).await {
        Ok(Ok(_)) => CheckStatus::ok("Connected"),
        Ok(Err(e)) => CheckStatus::error(format!("Database error: {}", e)),
        Err(_) => CheckStatus::error("Database ping timed out"),
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Cache reachable")
    } else {
        CheckStatus::error("Cache connection failed")
    }
}

fn check_click_queue(state: &AppState) -> CheckStatus {
    if state.click_sender.is_closed() {
        CheckStatus::error("Click queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.click_sender.capacity()))
    }
}
