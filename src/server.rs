//! HTTP server initialization and runtime setup.
//!
//! Constructs every client and service handle once at startup — pool, cache,
//! rate-limit counters, click worker — wires them into [`AppState`], and
//! hands the router to axum.

use crate::config::Config;
use crate::application::services::{LinkService, ResolverService};
use crate::domain::click_worker::run_click_worker;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::PgShortLinkRepository;
use crate::infrastructure::ratelimit::{CounterStore, InMemoryCounters, RedisCounters};
use crate::api::middleware::rate_limit::RateLimiters;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool + migrations
/// - Redis cache and shared rate-limit counters (or in-process fallbacks)
/// - Background click worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if the database connection, migration run, or server
/// bind fails.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let cache: Arc<dyn CacheService> = match &config.redis_url {
        Some(redis_url) => {
            match RedisCache::connect(redis_url, config.cache_ttl_seconds, config.cache_timeout)
                .await
            {
                Ok(redis) => {
                    tracing::info!("Cache enabled (Redis)");
                    Arc::new(redis)
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                    Arc::new(NullCache::new())
                }
            }
        }
        None => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    };

    // Shared counters when Redis is available, so multiple instances meter
    // the same quota; in-process counters otherwise.
    let counters: Arc<dyn CounterStore> = match &config.redis_url {
        Some(redis_url) => match RedisCounters::connect(redis_url, config.cache_timeout).await {
            Ok(redis) => {
                tracing::info!("Rate-limit counters shared via Redis");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to connect Redis counters: {}. Using in-memory counters.",
                    e
                );
                Arc::new(InMemoryCounters::new())
            }
        },
        None => Arc::new(InMemoryCounters::new()),
    };

    let repository = Arc::new(PgShortLinkRepository::new(
        pool.clone(),
        config.store_timeout,
    ));

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    tokio::spawn(run_click_worker(click_rx, repository.clone()));
    tracing::info!("Click worker started");

    let link_service = Arc::new(LinkService::new(repository.clone(), cache.clone()));
    let resolver_service = Arc::new(ResolverService::new(
        repository,
        cache.clone(),
        click_tx.clone(),
        config.cache_ttl_seconds,
    ));

    let state = AppState {
        resolver_service,
        link_service,
        cache,
        db: pool,
        click_sender: click_tx,
        public_base_url: config.public_base_url.clone(),
    };

    let limiters = RateLimiters::new(counters, config.trusted_proxy_header.clone());
    let app = app_router(state, &limiters);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
