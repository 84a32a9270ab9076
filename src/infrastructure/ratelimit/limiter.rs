//! Fixed-window admission control.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::warn;

use super::counters::CounterStore;
use super::policy::RatePolicy;

/// Outcome of an admission check. Rejection is normal control flow, not an
/// error: callers turn it into a 429 with a retry hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Admitted { remaining: u64 },
    Rejected { retry_after: Duration },
}

/// Fixed-window rate limiter for one operation class.
///
/// Windows reset atomically at interval boundaries: the window index is
/// `now_secs / window_secs`, so the (N+1)-th request inside a window is
/// rejected and the first request of the next window is admitted again.
/// Counter-store failures admit the request (fail open) — losing a little
/// quota accuracy beats refusing legitimate traffic.
pub struct FixedWindowLimiter {
    policy: RatePolicy,
    counters: Arc<dyn CounterStore>,
}

impl FixedWindowLimiter {
    pub fn new(policy: RatePolicy, counters: Arc<dyn CounterStore>) -> Self {
        Self { policy, counters }
    }

    pub fn policy(&self) -> &RatePolicy {
        &self.policy
    }

    /// Checks admission for `client_key` at the current wall-clock time.
    pub async fn check(&self, client_key: &str) -> RateDecision {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.check_at(client_key, now).await
    }

    /// Checks admission at an explicit time since the Unix epoch.
    ///
    /// Split out from [`check`](Self::check) so window-boundary behavior is
    /// testable without sleeping through real windows.
    pub async fn check_at(&self, client_key: &str, now: Duration) -> RateDecision {
        let window_secs = self.policy.window.as_secs().max(1);
        let window_index = now.as_secs() / window_secs;

        // Counter keys carry the operation name so classes never share quota.
        let key = format!("{}:{}", self.policy.operation, client_key);
        let expiry = self.policy.window * 2;

        let count = match self.counters.incr(&key, window_index, expiry).await {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    operation = self.policy.operation,
                    error = %e,
                    "counter store unavailable, admitting request"
                );
                return RateDecision::Admitted {
                    remaining: self.policy.max_requests,
                };
            }
        };

        if count <= self.policy.max_requests {
            RateDecision::Admitted {
                remaining: self.policy.max_requests - count,
            }
        } else {
            let window_end = (window_index + 1) * window_secs;
            let retry_after = Duration::from_secs(window_end.saturating_sub(now.as_secs()).max(1));
            RateDecision::Rejected { retry_after }
        }
    }
}
