//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink, ShortLinkPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short link storage.
///
/// The store is the single source of truth for code uniqueness, ownership and
/// the click counter. Per-record consistency is delegated to the store's
/// atomic primitives: [`record_click`](Self::record_click) and
/// [`update_scoped`](Self::update_scoped) must each execute as one atomic
/// statement so concurrent callers never lose writes to a read-modify-write
/// race.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`; integration tests use an in-memory
///   double (`tests/common`)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Inserts a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the short code already exists. The
    /// caller treats this as retryable and regenerates the code.
    /// Returns [`AppError::Internal`] on other database errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DependencyTimeout`] or [`AppError::Internal`] on
    /// database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Lists all links belonging to an owner, newest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError>;

    /// Applies a partial update scoped to `id` AND `owner_id` in one atomic
    /// statement.
    ///
    /// Returns the short code of the updated link so the caller can
    /// invalidate the cache entry, or `None` when no row matched. A
    /// non-matching id and a foreign owner are indistinguishable by design.
    async fn update_scoped(
        &self,
        id: i64,
        owner_id: &str,
        patch: ShortLinkPatch,
    ) -> Result<Option<String>, AppError>;

    /// Atomically increments `total_clicks` for an active link.
    ///
    /// Returns `false` when the code is unknown or the link is inactive.
    async fn record_click(&self, code: &str) -> Result<bool, AppError>;
}
