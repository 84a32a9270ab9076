//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),
    #[error("Cache operation error: {0}")]
    Operation(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for the resolution cache holding `short code -> long URL`.
///
/// The cache is a derived, expiring copy of store data and never the source
/// of truth. Read and write paths are fail-open: an unreachable cache
/// degrades to store lookups, it never fails a request. Only
/// [`invalidate`](Self::invalidate) surfaces its error, because callers must
/// log a warning when an update commits but the stale entry survives.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed, TTL at write
/// - [`crate::infrastructure::cache::NullCache`] - no-op for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the long URL for a short code.
    ///
    /// Returns `Ok(None)` on a miss *and* on a backend error (fail-open);
    /// production implementations log the error and degrade to a miss.
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping with a TTL.
    ///
    /// `ttl_seconds = None` applies the implementation default. Errors are
    /// logged and swallowed so a cache outage never blocks a redirect.
    async fn set_url(
        &self,
        short_code: &str,
        long_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached mapping after the owning record was mutated.
    ///
    /// # Errors
    ///
    /// Propagates backend failures — the caller logs a warning but does not
    /// roll back the committed store update. The TTL bounds the resulting
    /// staleness window.
    async fn invalidate(&self, short_code: &str) -> CacheResult<()>;

    /// Checks whether the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
