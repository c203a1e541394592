//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::credits::CreditTimeline;
use crate::delegation::DelegationIndex;
use crate::process_ids::ProcessRegistry;
use crate::query::QueryExecutor;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Runs built queries against the gateway
    pub executor: Arc<dyn QueryExecutor>,
    /// Credit timelines for the configured process
    pub credits: Arc<CreditTimeline>,
    /// Delegation snapshot
    pub delegations: Arc<DelegationIndex>,
    /// Named process ids
    pub process_ids: Arc<ProcessRegistry>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        credits: Arc<CreditTimeline>,
        delegations: Arc<DelegationIndex>,
        process_ids: ProcessRegistry,
        config: ApiConfig,
    ) -> Self {
        Self {
            executor,
            credits,
            delegations,
            process_ids: Arc::new(process_ids),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
