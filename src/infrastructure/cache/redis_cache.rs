//! Redis-backed cache implementation.

use std::time::Duration;

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Cache key prefix; the full key is `short:<code>`.
const KEY_PREFIX: &str = "short:";

/// Redis cache for resolved URL mappings.
///
/// Uses `ConnectionManager` for connection reuse and reconnects. Every
/// operation is bounded by `op_timeout` so a slow Redis cannot stall the
/// redirect path; timed-out reads degrade to a miss.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - connection string, e.g. `redis://localhost:6379`
    /// - `default_ttl_seconds` - TTL applied when `set_url` is called with
    ///   `ttl_seconds = None` (`CACHE_TTL_SECONDS` env var)
    /// - `op_timeout` - per-operation deadline (`CACHE_TIMEOUT_MS` env var)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING health check fails.
    pub async fn connect(
        redis_url: &str,
        default_ttl_seconds: u64,
        op_timeout: Duration,
    ) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        tokio::time::timeout(op_timeout, test_conn.ping::<()>())
            .await
            .map_err(|_| CacheError::Connection("Redis PING timed out".to_string()))?
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            op_timeout,
        })
    }

    fn build_key(&self, short_code: &str) -> String {
        format!("{}{}", KEY_PREFIX, short_code)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        match tokio::time::timeout(self.op_timeout, conn.get::<_, Option<String>>(&key)).await {
            Ok(Ok(Some(url))) => {
                debug!(short_code, "cache HIT");
                Ok(Some(url))
            }
            Ok(Ok(None)) => {
                debug!(short_code, "cache MISS");
                Ok(None)
            }
            Ok(Err(e)) => {
                error!(short_code, error = %e, "Redis GET error, degrading to miss");
                Ok(None)
            }
            Err(_) => {
                warn!(short_code, "Redis GET timed out, degrading to miss");
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        short_code: &str,
        long_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        match tokio::time::timeout(self.op_timeout, conn.set_ex::<_, _, ()>(&key, long_url, ttl))
            .await
        {
            Ok(Ok(())) => {
                debug!(short_code, ttl, "cache SET");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(short_code, error = %e, "Redis SET error, entry not cached");
                Ok(())
            }
            Err(_) => {
                warn!(short_code, "Redis SET timed out, entry not cached");
                Ok(())
            }
        }
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        match tokio::time::timeout(self.op_timeout, conn.del::<_, i64>(&key)).await {
            Ok(Ok(deleted)) => {
                if deleted > 0 {
                    debug!(short_code, "cache INVALIDATE");
                }
                Ok(())
            }
            Ok(Err(e)) => Err(CacheError::Operation(format!("Redis DEL failed: {}", e))),
            Err(_) => Err(CacheError::Operation("Redis DEL timed out".to_string())),
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        matches!(
            tokio::time::timeout(self.op_timeout, conn.ping::<()>()).await,
            Ok(Ok(()))
        )
    }
}
