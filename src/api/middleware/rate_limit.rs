//! Rate limiting middleware over the fixed-window limiter.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::infrastructure::ratelimit::{
    CounterStore, FixedWindowLimiter, RateDecision, policy,
};
use crate::utils::client_ip::resolve_client_ip;

/// Per-stage middleware state: one limiter plus the client-key settings.
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Arc<FixedWindowLimiter>,
    trusted_proxy_header: Option<String>,
}

impl RateLimitState {
    pub fn new(limiter: FixedWindowLimiter, trusted_proxy_header: Option<String>) -> Self {
        Self {
            limiter: Arc::new(limiter),
            trusted_proxy_header,
        }
    }
}

/// The full set of limiter stages, one per operation class.
///
/// All stages share one [`CounterStore`], so quotas live in one place whether
/// that place is in-process or Redis.
#[derive(Clone)]
pub struct RateLimiters {
    pub global: RateLimitState,
    pub create: RateLimitState,
    pub list: RateLimitState,
    pub update: RateLimitState,
    pub redirect: RateLimitState,
}

impl RateLimiters {
    pub fn new(counters: Arc<dyn CounterStore>, trusted_proxy_header: Option<String>) -> Self {
        let stage = |p| {
            RateLimitState::new(
                FixedWindowLimiter::new(p, counters.clone()),
                trusted_proxy_header.clone(),
            )
        };

        Self {
            global: stage(policy::GLOBAL),
            create: stage(policy::CREATE_LINK),
            list: stage(policy::LIST_LINKS),
            update: stage(policy::UPDATE_LINK),
            redirect: stage(policy::REDIRECT),
        }
    }
}

/// Admits or rejects the request against this stage's window.
///
/// The client key is resolved per the configured proxy-header precedence;
/// rejection becomes a 429 with a `Retry-After` hint naming the operation.
pub async fn enforce(
    State(stage): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);

    let client_key = resolve_client_ip(req.headers(), peer, stage.trusted_proxy_header.as_deref());

    match stage.limiter.check(&client_key).await {
        RateDecision::Admitted { .. } => Ok(next.run(req).await),
        RateDecision::Rejected { retry_after } => Err(AppError::rate_limited(
            stage.limiter.policy().operation,
            retry_after.as_secs().max(1),
        )),
    }
}
