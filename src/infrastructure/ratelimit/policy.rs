//! Fixed-window rate limit policies, one per operation class.

use std::time::Duration;

/// A fixed-window admission policy.
///
/// `operation` names the class in rejection responses and counter keys, so it
/// must be unique across policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    pub operation: &'static str,
    pub window: Duration,
    pub max_requests: u64,
}

impl RatePolicy {
    pub const fn new(operation: &'static str, window: Duration, max_requests: u64) -> Self {
        Self {
            operation,
            window,
            max_requests,
        }
    }
}

/// Link creation: 20 per 15 minutes.
pub const CREATE_LINK: RatePolicy = RatePolicy::new("create_link", Duration::from_secs(15 * 60), 20);

/// Owner listings: 30 per minute.
pub const LIST_LINKS: RatePolicy = RatePolicy::new("list_links", Duration::from_secs(60), 30);

/// Link updates: 10 per minute.
pub const UPDATE_LINK: RatePolicy = RatePolicy::new("update_link", Duration::from_secs(60), 10);

/// Public redirects: 60 per minute.
pub const REDIRECT: RatePolicy = RatePolicy::new("redirect", Duration::from_secs(60), 60);

/// All requests regardless of class: 100 per minute.
pub const GLOBAL: RatePolicy = RatePolicy::new("global", Duration::from_secs(60), 100);
