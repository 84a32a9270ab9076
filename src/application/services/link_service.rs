//! Ownership service: create, list and mutate short links for an owner.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{NewShortLink, ShortLink, ShortLinkPatch};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::generate_code;

/// Attempts before a code collision streak becomes a creation failure.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Service for owner-scoped link management.
///
/// The store enforces code uniqueness; this service supplies the regenerate-
/// and-retry loop on collision and the cache invalidation that keeps
/// redirects from serving stale targets after an update.
pub struct LinkService {
    repository: Arc<dyn ShortLinkRepository>,
    cache: Arc<dyn CacheService>,
}

impl LinkService {
    pub fn new(repository: Arc<dyn ShortLinkRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Creates a short link for `owner_id`.
    ///
    /// Generates a random 7-character code and inserts; a uniqueness
    /// violation regenerates and retries up to [`MAX_CODE_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RetryExhausted`] when every attempt collided,
    /// [`AppError::Internal`] / [`AppError::DependencyTimeout`] on store
    /// failures.
    pub async fn create_link(
        &self,
        owner_id: &str,
        long_url: String,
    ) -> Result<ShortLink, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let new_link = NewShortLink {
                short_code: generate_code(),
                long_url: long_url.clone(),
                owner_id: owner_id.to_string(),
            };

            match self.repository.insert(new_link).await {
                Ok(link) => return Ok(link),
                Err(e) if e.is_conflict() => {
                    debug!(attempt, "short code collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::retry_exhausted(
            "Failed to generate a unique short code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Lists the owner's links, newest first.
    ///
    /// Read-only and store-only — listings never touch the cache.
    pub async fn list_links(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        self.repository.list_by_owner(owner_id).await
    }

    /// Applies a partial update to a link the owner holds.
    ///
    /// The update matches `id` AND `owner_id` in one atomic statement; a
    /// miss on either is reported as the same not-found outcome so callers
    /// cannot probe for foreign ids. On success the cache entry for the
    /// link's code is invalidated — if that fails, the committed update
    /// stands and the TTL bounds the staleness window.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty patch and
    /// [`AppError::NotFound`] when no owned row matched.
    pub async fn update_link(
        &self,
        owner_id: &str,
        id: i64,
        patch: ShortLinkPatch,
    ) -> Result<(), AppError> {
        if patch.is_empty() {
            return Err(AppError::bad_request(
                "Nothing to update: provide longUrl and/or isActive",
                json!({}),
            ));
        }

        let short_code = self
            .repository
            .update_scoped(id, owner_id, patch)
            .await?
            .ok_or_else(|| {
                AppError::not_found("URL not found or access denied", json!({ "id": id }))
            })?;

        if let Err(e) = self.cache.invalidate(&short_code).await {
            warn!(
                short_code,
                error = %e,
                "cache invalidation failed after update; stale entry expires with TTL"
            );
        }

        Ok(())
    }
}
