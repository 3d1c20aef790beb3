//! Shared application state for the webhook forwarder server.

use crate::config::ConfigStore;
use crate::history::HistoryRing;
use std::sync::Arc;

/// Default number of recent messages kept in the in-memory history ring.
pub const HISTORY_CAPACITY: usize = 100;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of truth for targets, routes, and templates.
    pub config: Arc<ConfigStore>,
    /// Recently received messages, most recent first.
    pub history: Arc<HistoryRing>,
    /// Shared outbound HTTP client used for all target dispatch.
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Arc<ConfigStore>) -> Self {
        Self {
            config,
            history: Arc::new(HistoryRing::new(HISTORY_CAPACITY)),
            client: reqwest::Client::new(),
        }
    }
}
