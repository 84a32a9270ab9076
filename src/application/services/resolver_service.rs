//! Resolution service: the redirect hot path.
//!
//! Cache-aside with best-effort accounting. The cache answers first; the
//! store is the source of truth on a miss and receives the click increment
//! either way. Accounting rides a bounded channel to a background worker so
//! counter writes can never add latency to, or fail, a redirect.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Resolves short codes to long URLs.
pub struct ResolverService {
    repository: Arc<dyn ShortLinkRepository>,
    cache: Arc<dyn CacheService>,
    click_tx: mpsc::Sender<ClickEvent>,
    cache_ttl_seconds: u64,
}

impl ResolverService {
    pub fn new(
        repository: Arc<dyn ShortLinkRepository>,
        cache: Arc<dyn CacheService>,
        click_tx: mpsc::Sender<ClickEvent>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            repository,
            cache,
            click_tx,
            cache_ttl_seconds,
        }
    }

    /// Resolves a short code to its destination URL.
    ///
    /// # Algorithm
    ///
    /// 1. Cache lookup (fail-open: errors degrade to a miss).
    /// 2. **Hit**: queue the click and return the cached URL. The cached
    ///    value is honored even if the store row has meanwhile vanished —
    ///    availability over strict consistency here, bounded by the TTL.
    /// 3. **Miss**: read the store. Unknown or deactivated codes return
    ///    [`AppError::NotFound`] and are never cached. Active links queue the
    ///    click, populate the cache with the configured TTL (best-effort,
    ///    off the response path) and return the URL.
    ///
    /// # Errors
    ///
    /// Only a store failure on the miss-path read surfaces; accounting and
    /// cache writes never fail a resolution.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if let Ok(Some(cached_url)) = self.cache.get_url(code).await {
            self.queue_click(code);
            return Ok(cached_url);
        }

        let link = self
            .repository
            .find_by_code(code)
            .await?
            .filter(|link| link.is_active)
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code }))
            })?;

        self.queue_click(code);

        let cache = self.cache.clone();
        let cache_code = code.to_string();
        let url = link.long_url.clone();
        let ttl = self.cache_ttl_seconds;
        tokio::spawn(async move {
            if let Err(e) = cache.set_url(&cache_code, &url, Some(ttl)).await {
                warn!(code = %cache_code, error = %e, "failed to cache resolved URL");
            }
        });

        Ok(link.long_url)
    }

    /// Queues a click for the background worker. A full queue drops the
    /// event — under-counting is acceptable, blocking the redirect is not.
    fn queue_click(&self, code: &str) {
        if self.click_tx.try_send(ClickEvent::new(code)).is_err() {
            debug!(code, "click queue full or closed, dropping event");
        }
    }
}
