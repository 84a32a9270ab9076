//! Counter storage backends for the fixed-window limiter.
//!
//! Counters live behind [`CounterStore`] so a single instance can keep them
//! in process while a multi-instance deployment shares quota through Redis.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::warn;

/// Errors from a counter backend. The limiter fails open on these.
#[derive(Debug, thiserror::Error)]
#[error("counter store error: {0}")]
pub struct CounterError(pub String);

/// Storage for per-key fixed-window counters.
///
/// `window_index` identifies the current window (seconds-since-epoch divided
/// by the window length); implementations must reset a key's count whenever
/// its stored index differs from the one passed in.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increments the counter for `key` within the given window and returns
    /// the count after the increment.
    async fn incr(
        &self,
        key: &str,
        window_index: u64,
        expiry: Duration,
    ) -> Result<u64, CounterError>;
}

/// Entries idle longer than this are dropped during pruning.
const PRUNE_IDLE: Duration = Duration::from_secs(3600);

/// Map size that triggers a prune pass.
const PRUNE_THRESHOLD: usize = 65_536;

#[derive(Clone, Copy)]
struct WindowCount {
    window_index: u64,
    count: u64,
    touched: Instant,
}

/// In-process counters for single-instance deployments.
///
/// A plain mutex is enough here: the critical section is a map lookup and an
/// integer bump. Stale client keys are pruned once the map grows past a
/// threshold.
#[derive(Default)]
pub struct InMemoryCounters {
    entries: Mutex<HashMap<String, WindowCount>>,
}

impl InMemoryCounters {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounters {
    async fn incr(
        &self,
        key: &str,
        window_index: u64,
        _expiry: Duration,
    ) -> Result<u64, CounterError> {
        let now = Instant::now();
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CounterError("counter map poisoned".to_string()))?;

        if entries.len() > PRUNE_THRESHOLD {
            entries.retain(|_, e| now.duration_since(e.touched) < PRUNE_IDLE);
        }

        let entry = entries.entry(key.to_string()).or_insert(WindowCount {
            window_index,
            count: 0,
            touched: now,
        });

        if entry.window_index != window_index {
            entry.window_index = window_index;
            entry.count = 0;
        }

        entry.count += 1;
        entry.touched = now;

        Ok(entry.count)
    }
}

/// Redis-backed counters for deployments that share quota across instances.
///
/// Keys are `rl:<key>:<window_index>`; the first increment of a window sets
/// an expiry of twice the window so abandoned keys clean themselves up.
pub struct RedisCounters {
    client: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCounters {
    /// Connects to Redis for shared rate-limit counters.
    pub async fn connect(redis_url: &str, op_timeout: Duration) -> Result<Self, CounterError> {
        let client = Client::open(redis_url)
            .map_err(|e| CounterError(format!("failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CounterError(format!("failed to connect to Redis: {}", e)))?;

        Ok(Self {
            client: manager,
            op_timeout,
        })
    }
}

#[async_trait]
impl CounterStore for RedisCounters {
    async fn incr(
        &self,
        key: &str,
        window_index: u64,
        expiry: Duration,
    ) -> Result<u64, CounterError> {
        let redis_key = format!("rl:{}:{}", key, window_index);
        let mut conn = self.client.clone();

        let count: u64 = tokio::time::timeout(self.op_timeout, conn.incr(&redis_key, 1u64))
            .await
            .map_err(|_| CounterError("Redis INCR timed out".to_string()))?
            .map_err(|e| CounterError(format!("Redis INCR failed: {}", e)))?;

        if count == 1 {
            let ttl = expiry.as_secs().max(1) as i64;
            match tokio::time::timeout(self.op_timeout, conn.expire::<_, i64>(&redis_key, ttl))
                .await
            {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    warn!(key = %redis_key, error = %e, "Redis EXPIRE failed, window key will linger");
                }
                Err(_) => {
                    warn!(key = %redis_key, "Redis EXPIRE timed out, window key will linger");
                }
            }
        }

        Ok(count)
    }
}
