#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::mpsc;

use snaplink::AppError;
use snaplink::api::middleware::rate_limit::RateLimiters;
use snaplink::application::services::{LinkService, ResolverService};
use snaplink::domain::click_worker::run_click_worker;
use snaplink::domain::entities::{NewShortLink, ShortLink, ShortLinkPatch};
use snaplink::domain::repositories::ShortLinkRepository;
use snaplink::infrastructure::cache::{CacheResult, CacheService};
use snaplink::infrastructure::ratelimit::InMemoryCounters;
use snaplink::state::AppState;

pub const BASE_URL: &str = "https://sho.rt";

/// In-memory repository double. A single mutex stands in for the store's
/// atomicity guarantees, so concurrent `record_click` calls never lose
/// increments.
#[derive(Default)]
pub struct InMemoryRepository {
    links: Mutex<Vec<ShortLink>>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            links: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Seeds a link directly, bypassing the service layer.
    pub fn seed(&self, code: &str, url: &str, owner: &str, active: bool) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.links.lock().unwrap().push(ShortLink {
            id,
            short_code: code.to_string(),
            long_url: url.to_string(),
            owner_id: owner.to_string(),
            is_active: active,
            total_clicks: 0,
            created_at: Utc::now(),
        });
        id
    }

    pub fn total_clicks(&self, code: &str) -> Option<i64> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_code == code)
            .map(|l| l.total_clicks)
    }

    pub fn get_by_code(&self, code: &str) -> Option<ShortLink> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_code == code)
            .cloned()
    }
}

#[async_trait]
impl ShortLinkRepository for InMemoryRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut links = self.links.lock().unwrap();

        if links.iter().any(|l| l.short_code == new_link.short_code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "short_links_short_code_key" }),
            ));
        }

        let link = ShortLink {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            short_code: new_link.short_code,
            long_url: new_link.long_url,
            owner_id: new_link.owner_id,
            is_active: true,
            total_clicks: 0,
            created_at: Utc::now(),
        };

        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_code == code)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let mut owned: Vec<ShortLink> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();

        owned.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(owned)
    }

    async fn update_scoped(
        &self,
        id: i64,
        owner_id: &str,
        patch: ShortLinkPatch,
    ) -> Result<Option<String>, AppError> {
        let mut links = self.links.lock().unwrap();

        let Some(link) = links
            .iter_mut()
            .find(|l| l.id == id && l.owner_id == owner_id)
        else {
            return Ok(None);
        };

        if let Some(url) = patch.long_url {
            link.long_url = url;
        }
        if let Some(active) = patch.is_active {
            link.is_active = active;
        }

        Ok(Some(link.short_code.clone()))
    }

    async fn record_click(&self, code: &str) -> Result<bool, AppError> {
        let mut links = self.links.lock().unwrap();

        match links
            .iter_mut()
            .find(|l| l.short_code == code && l.is_active)
        {
            Some(link) => {
                link.total_clicks += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory cache double (TTL is ignored; entries live until invalidated).
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, code: &str, url: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(code.to_string(), url.to_string());
    }

    pub fn get(&self, code: &str) -> Option<String> {
        self.entries.lock().unwrap().get(code).cloned()
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(short_code).cloned())
    }

    async fn set_url(
        &self,
        short_code: &str,
        long_url: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(short_code.to_string(), long_url.to_string());
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(short_code);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Builds an [`AppState`] over in-memory doubles, with the click worker
/// running so accounting behaves as in production.
pub fn create_test_state(
    repository: Arc<InMemoryRepository>,
    cache: Arc<InMemoryCache>,
) -> AppState {
    let repo: Arc<dyn ShortLinkRepository> = repository;
    let cache_dyn: Arc<dyn CacheService> = cache;

    let (click_tx, click_rx) = mpsc::channel(1000);
    tokio::spawn(run_click_worker(click_rx, repo.clone()));

    let link_service = Arc::new(LinkService::new(repo.clone(), cache_dyn.clone()));
    let resolver_service = Arc::new(ResolverService::new(
        repo,
        cache_dyn.clone(),
        click_tx.clone(),
        3600,
    ));

    // Lazy pool: never actually connects unless the health check runs.
    let db = PgPoolOptions::new()
        .connect_lazy("postgres://localhost:1/unreachable")
        .unwrap();

    AppState {
        resolver_service,
        link_service,
        cache: cache_dyn,
        db,
        click_sender: click_tx,
        public_base_url: BASE_URL.to_string(),
    }
}

/// Full application router over in-memory doubles and default policies.
pub fn create_test_app(state: AppState) -> axum::Router {
    let limiters = RateLimiters::new(Arc::new(InMemoryCounters::new()), None);
    snaplink::routes::router(state, &limiters)
}

/// Waits until the click worker has drained, up to a short deadline.
pub async fn wait_for_clicks(repo: &InMemoryRepository, code: &str, expected: i64) {
    for _ in 0..100 {
        if repo.total_clicks(code) == Some(expected) {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
