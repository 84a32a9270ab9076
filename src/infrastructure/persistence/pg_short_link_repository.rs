//! PostgreSQL implementation of the short link repository.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;

use crate::domain::entities::{NewShortLink, ShortLink, ShortLinkPatch};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::{AppError, map_sqlx_error};

const COLUMNS: &str = "id, short_code, long_url, owner_id, is_active, total_clicks, created_at";

/// PostgreSQL repository for short link storage.
///
/// Every query runs under a bounded deadline so a slow store stalls a single
/// request, never the service. Increment and scoped update are single
/// statements, so per-record consistency rides on Postgres atomicity and no
/// in-process locking is needed.
pub struct PgShortLinkRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgShortLinkRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(|e| {
                tracing::error!(error = %e, "database query failed");
                map_sqlx_error(e)
            }),
            Err(_) => Err(AppError::dependency_timeout(
                "Database query timed out",
                json!({ "timeoutMs": self.query_timeout.as_millis() as u64 }),
            )),
        }
    }
}

#[async_trait]
impl ShortLinkRepository for PgShortLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            "INSERT INTO short_links (short_code, long_url, owner_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );

        self.bounded(
            sqlx::query_as::<_, ShortLink>(&sql)
                .bind(&new_link.short_code)
                .bind(&new_link.long_url)
                .bind(&new_link.owner_id)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM short_links WHERE short_code = $1");

        self.bounded(
            sqlx::query_as::<_, ShortLink>(&sql)
                .bind(code)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM short_links
             WHERE owner_id = $1
             ORDER BY created_at DESC, id DESC"
        );

        self.bounded(
            sqlx::query_as::<_, ShortLink>(&sql)
                .bind(owner_id)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn update_scoped(
        &self,
        id: i64,
        owner_id: &str,
        patch: ShortLinkPatch,
    ) -> Result<Option<String>, AppError> {
        // Single statement: the id + owner predicate and the field updates
        // commit atomically, and RETURNING hands back the code for cache
        // invalidation without a second round-trip.
        let row = self
            .bounded(
                sqlx::query_scalar::<_, String>(
                    "UPDATE short_links
                     SET long_url = COALESCE($3, long_url),
                         is_active = COALESCE($4, is_active)
                     WHERE id = $1 AND owner_id = $2
                     RETURNING short_code",
                )
                .bind(id)
                .bind(owner_id)
                .bind(patch.long_url)
                .bind(patch.is_active)
                .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row)
    }

    async fn record_click(&self, code: &str) -> Result<bool, AppError> {
        let result = self
            .bounded(
                sqlx::query(
                    "UPDATE short_links
                     SET total_clicks = total_clicks + 1
                     WHERE short_code = $1 AND is_active",
                )
                .bind(code)
                .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
