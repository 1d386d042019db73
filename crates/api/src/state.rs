//! Application state
//!
//! Shared state for API handlers: the document store and the notifier, both
//! injected at construction so tests can substitute in-memory fakes.

use std::sync::Arc;

use sangam_notify::Notifier;
use sangam_store::Store;

/// Shared application state
///
/// Handlers hold no other mutable state; every request works directly
/// against the store through this handle.
#[derive(Clone)]
pub struct AppState {
    /// Document store (users + sos_alerts collections)
    pub store: Arc<dyn Store>,
    /// Notification dispatch capability
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }
}
