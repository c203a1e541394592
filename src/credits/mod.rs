//! Credit Timelines
//!
//! Turns credit notices from an external service into cumulative time
//! series for charts and tables:
//!
//! - **types**: Notices, aggregated points, chart/table projections
//! - **aggregate**: Chronological sort + running sum
//! - **cache**: Per-payment-method fetch freshness
//! - **fetcher**: Notice-fetch collaborator
//! - **timeline**: Cached, generation-guarded loading
//!
//! # Data Flow
//!
//! ```text
//! NoticeFetcher → aggregate() → retained per payment method → series / rows
//! ```

mod aggregate;
mod cache;
mod error;
mod fetcher;
mod timeline;
mod types;

pub use aggregate::aggregate;
pub use cache::{Clock, FetchCache, ManualClock, SystemClock, DEFAULT_CACHE_TTL};
pub use error::{CreditsError, CreditsResult};
pub use fetcher::{HttpNoticeFetcher, NoticeFetcher};
pub use timeline::{CreditTimeline, LoadOutcome, LoadStatus};
pub use types::{
    normalize_timestamp, parse_quantity, table_rows, AggregatedNotice, CreditNotice, CreditRow,
    CreditSeries, PaymentMethod, MILLIS_THRESHOLD,
};
