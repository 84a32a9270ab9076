//! Click event passed from the redirect path to the background worker.

/// A single resolved redirect, queued for best-effort click accounting.
///
/// Carries only the short code: the worker's increment statement re-checks
/// activity against the store, so no other state needs to travel with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
}

impl ClickEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
