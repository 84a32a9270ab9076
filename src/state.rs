//! Shared application state injected into handlers.
//!
//! Clients and services are constructed once at startup (see
//! [`crate::server::run`]) and passed around explicitly — no ambient
//! globals, so tests can inject doubles.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::application::services::{LinkService, ResolverService};
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub resolver_service: Arc<ResolverService>,
    pub link_service: Arc<LinkService>,
    pub cache: Arc<dyn CacheService>,
    pub db: PgPool,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Public base address, used to build `shortUrl` in create responses and
    /// as the destination for not-found/error redirects.
    pub public_base_url: String,
}

impl AppState {
    /// Returns the public base without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }
}
