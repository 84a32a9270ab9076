//! Background worker that flushes click events to the store.
//!
//! Accounting is best-effort by contract: an increment failure is logged and
//! the event dropped, so a slow or unavailable store can never block the
//! redirect path that produced the event.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ShortLinkRepository;

/// Consumes click events until the channel closes.
///
/// Each event becomes one atomic `total_clicks + 1` statement against the
/// store. Events for deactivated or vanished links are skipped silently —
/// the increment predicate carries the activity check.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn ShortLinkRepository>,
) {
    while let Some(event) = rx.recv().await {
        match repository.record_click(&event.code).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(code = %event.code, "click dropped, link missing or inactive");
            }
            Err(e) => {
                warn!(code = %event.code, error = %e, "failed to record click");
            }
        }
    }

    debug!("click worker stopped, channel closed");
}
