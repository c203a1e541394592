//! # Permadash
//!
//! Backend core for a Permaweb statistics dashboard: ad-hoc transaction
//! queries, cumulative credit timelines and delegation breakdowns for an
//! AO network.
//!
//! ## Modules
//!
//! - [`query`]: Query assembly, GraphQL rendering and gateway execution
//! - [`credits`]: Credit-notice aggregation with a cached, generation-guarded timeline
//! - [`delegation`]: Per-project delegation totals and delegator breakdowns
//! - [`process_ids`]: Named process ids grouped for display
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use permadash::query::{build_query, QueryFields, QueryFilters, Tag};
//!
//! let filters = QueryFilters {
//!     tags: vec![Tag::new("App-Name", "aos")],
//!     ..Default::default()
//! };
//! let query = build_query(&filters, &QueryFields::default(), 10);
//!
//! assert_eq!(query.limit(), Some(10));
//! assert!(query.to_graphql().contains("sort: HEIGHT_DESC"));
//! ```
//!
//! ```rust
//! use permadash::credits::{aggregate, CreditNotice};
//!
//! let notices = vec![CreditNotice {
//!     id: "n1".into(),
//!     recipient: "game".into(),
//!     quantity: "12.5".into(),
//!     sender: "buyer".into(),
//!     from_process: "token".into(),
//!     ingested_at: 1_700_000_000,
//! }];
//!
//! let timeline = aggregate(&notices);
//! assert_eq!(timeline[0].timestamp, 1_700_000_000_000);
//! assert_eq!(timeline[0].cumulative_amount, 12.5);
//! ```

pub mod api;
pub mod config;
pub mod credits;
pub mod delegation;
pub mod process_ids;
pub mod query;

// Re-export top-level types for convenience
pub use query::{
    build_query, ExecutionOutcome, Field, GatewayClient, GatewayConfig, GraphqlRequest,
    QueryDescriptor, QueryError, QueryExecutor, QueryFields, QueryFilters, Tag,
};

pub use credits::{
    aggregate, AggregatedNotice, CreditNotice, CreditTimeline, CreditsError, HttpNoticeFetcher,
    LoadOutcome, LoadStatus, NoticeFetcher, PaymentMethod,
};

pub use delegation::{
    DelegationError, DelegationIndex, DelegationSource, DelegationView, HttpDelegationSource,
};

pub use process_ids::{ProcessIdGroup, ProcessRegistry};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig};
