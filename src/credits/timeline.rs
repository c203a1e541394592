//! Credit Timeline
//!
//! Loads, aggregates and retains the credit timeline for each payment method
//! of one process.
//!
//! ## Freshness
//!
//! A load is skipped while the last successful fetch for the payment method
//! is younger than the cache TTL, unless the caller forces a refresh.
//!
//! ## Stale responses
//!
//! Every fetch takes a generation ticket before it awaits the collaborator.
//! When the response arrives it is applied only if its ticket is still the
//! newest one issued for that payment method and the timeline has not been
//! closed. Superseded responses are dropped, so the most recent *request*
//! wins no matter which response lands last. There is no way to abort a
//! fetch already in flight; its result is simply ignored.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::aggregate::aggregate;
use super::cache::{Clock, FetchCache, SystemClock, DEFAULT_CACHE_TTL};
use super::error::{CreditsError, CreditsResult};
use super::fetcher::NoticeFetcher;
use super::types::{AggregatedNotice, PaymentMethod};

/// How a load resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    /// New data fetched and applied
    Fetched,
    /// Skipped, cache still fresh
    Cached,
    /// Response arrived after a newer request and was dropped
    Stale,
    /// Collaborator failed; previous output retained
    Failed,
    /// Timeline closed; nothing applied
    Closed,
}

/// Result of a load, always carrying the output currently retained
#[derive(Debug, Clone, Serialize)]
pub struct LoadOutcome {
    pub payment_method: String,
    pub status: LoadStatus,
    pub notices: Vec<AggregatedNotice>,
    /// Epoch millis of the last successful fetch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fetched: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct TimelineState {
    cache: FetchCache,
    outputs: HashMap<String, Vec<AggregatedNotice>>,
    latest_ticket: HashMap<String, u64>,
}

impl TimelineState {
    fn outcome(&self, key: &str, status: LoadStatus, error: Option<String>) -> LoadOutcome {
        LoadOutcome {
            payment_method: key.to_string(),
            status,
            notices: self.outputs.get(key).cloned().unwrap_or_default(),
            last_fetched: self.cache.last_fetch(key),
            error,
        }
    }
}

/// Per-process credit timelines
pub struct CreditTimeline {
    process_id: String,
    payment_methods: Vec<PaymentMethod>,
    fetcher: Arc<dyn NoticeFetcher>,
    clock: Arc<dyn Clock>,
    state: RwLock<TimelineState>,
    generation: AtomicU64,
    closed: AtomicBool,
}

impl CreditTimeline {
    /// Create a timeline with the default 24h TTL and the system clock
    pub fn new(process_id: impl Into<String>, fetcher: Arc<dyn NoticeFetcher>) -> Self {
        Self {
            process_id: process_id.into(),
            payment_methods: Vec::new(),
            fetcher,
            clock: Arc::new(SystemClock),
            state: RwLock::new(TimelineState {
                cache: FetchCache::new(DEFAULT_CACHE_TTL),
                ..Default::default()
            }),
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.state.get_mut().cache = FetchCache::new(ttl);
        self
    }

    /// Restrict loads to a known set of payment methods.
    /// An empty list accepts any id.
    pub fn with_payment_methods(mut self, methods: Vec<PaymentMethod>) -> Self {
        self.payment_methods = methods;
        self
    }

    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    pub fn payment_methods(&self) -> &[PaymentMethod] {
        &self.payment_methods
    }

    pub fn check_payment_method(&self, id: &str) -> CreditsResult<()> {
        if self.payment_methods.is_empty() || self.payment_methods.iter().any(|m| m.id == id) {
            Ok(())
        } else {
            Err(CreditsError::UnknownPaymentMethod(id.to_string()))
        }
    }

    /// Stop applying results. In-flight fetches finish but are discarded.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!(process_id = %self.process_id, "Credit timeline closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Currently retained output without fetching
    pub async fn snapshot(&self, payment_method: &str) -> Vec<AggregatedNotice> {
        let state = self.state.read().await;
        state.outputs.get(payment_method).cloned().unwrap_or_default()
    }

    /// Load the timeline for a payment method.
    ///
    /// Fetch failures are logged and leave the previous output in place.
    /// Nothing is retried.
    pub async fn load(&self, payment_method: &str, force_refresh: bool) -> LoadOutcome {
        if self.is_closed() {
            let state = self.state.read().await;
            return state.outcome(payment_method, LoadStatus::Closed, None);
        }

        let ticket = {
            let mut state = self.state.write().await;

            if !force_refresh
                && state
                    .cache
                    .is_fresh(payment_method, self.clock.now_millis())
            {
                tracing::debug!(payment_method, "Credit timeline cache hit");
                return state.outcome(payment_method, LoadStatus::Cached, None);
            }

            let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state
                .latest_ticket
                .insert(payment_method.to_string(), ticket);
            ticket
        };

        tracing::debug!(
            process_id = %self.process_id,
            payment_method,
            ticket,
            force_refresh,
            "Fetching credit notices"
        );

        let result = self
            .fetcher
            .fetch_notices(&self.process_id, payment_method)
            .await;

        let mut state = self.state.write().await;

        match result {
            Ok(notices) => {
                if self.is_closed() {
                    tracing::debug!(payment_method, ticket, "Timeline closed, dropping response");
                    return state.outcome(payment_method, LoadStatus::Closed, None);
                }

                if state.latest_ticket.get(payment_method) != Some(&ticket) {
                    tracing::debug!(payment_method, ticket, "Superseded response dropped");
                    return state.outcome(payment_method, LoadStatus::Stale, None);
                }

                let aggregated = aggregate(&notices);
                tracing::info!(
                    payment_method,
                    notices = aggregated.len(),
                    "Credit timeline updated"
                );

                state
                    .outputs
                    .insert(payment_method.to_string(), aggregated);
                let now = self.clock.now_millis();
                state.cache.record(payment_method, now);

                state.outcome(payment_method, LoadStatus::Fetched, None)
            }
            Err(e) => {
                tracing::warn!(
                    process_id = %self.process_id,
                    payment_method,
                    error = %e,
                    "Failed to fetch credit notices"
                );
                state.outcome(payment_method, LoadStatus::Failed, Some(e.to_string()))
            }
        }
    }
}
