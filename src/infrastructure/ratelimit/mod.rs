//! Fixed-window rate limiting.
//!
//! Admission math lives in [`FixedWindowLimiter`]; counter storage is
//! pluggable via [`CounterStore`] ([`InMemoryCounters`] for one instance,
//! [`RedisCounters`] to share quota across several). Policies for each
//! operation class are defined in [`policy`].

mod counters;
mod limiter;
pub mod policy;

pub use counters::{CounterError, CounterStore, InMemoryCounters, RedisCounters};
pub use limiter::{FixedWindowLimiter, RateDecision};
pub use policy::RatePolicy;
