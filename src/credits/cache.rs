//! Fetch cache
//!
//! Remembers when each payment method was last fetched successfully so a
//! timeline is not re-fetched more than once per TTL window.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Default freshness window (24 hours)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 3600);

/// Source of "now", in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
        }
    }

    pub fn set(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Last-fetch times keyed by payment-method id
///
/// No eviction: an entry is only ever overwritten by a newer fetch.
#[derive(Debug, Clone)]
pub struct FetchCache {
    ttl_ms: i64,
    last_fetch: HashMap<String, i64>,
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            last_fetch: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms as u64)
    }

    /// True if the key was fetched less than one TTL before `now_ms`
    pub fn is_fresh(&self, key: &str, now_ms: i64) -> bool {
        self.last_fetch
            .get(key)
            .map(|&at| now_ms.saturating_sub(at) < self.ttl_ms)
            .unwrap_or(false)
    }

    pub fn record(&mut self, key: &str, now_ms: i64) {
        self.last_fetch.insert(key.to_string(), now_ms);
    }

    pub fn last_fetch(&self, key: &str) -> Option<i64> {
        self.last_fetch.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.last_fetch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fetch.is_empty()
    }
}
