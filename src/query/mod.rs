//! Query Builder
//!
//! Assembles Arweave GraphQL `transactions` queries from form inputs and
//! runs them against a gateway:
//!
//! - **AST**: Filters, field toggles and the query descriptor
//! - **Render**: GraphQL document and pretty-printed request text
//! - **Executor**: Gateway client
//!
//! # Example
//!
//! ```rust,ignore
//! use permadash::query::{build_query, execute_for_display, GatewayClient, GatewayConfig};
//!
//! let descriptor = build_query(&filters, &fields, 10);
//! println!("{}", descriptor.to_pretty_json()?);
//!
//! let gateway = GatewayClient::new(GatewayConfig::default())?;
//! let outcome = execute_for_display(&gateway, &descriptor.to_request()).await;
//! ```

mod ast;
mod error;
mod executor;
mod render;

pub use ast::{
    add_tag, build_query, remove_tag, Field, Predicate, QueryBuilder, QueryDescriptor,
    QueryFields, QueryFilters, SortOrder, Tag,
};
pub use error::{QueryError, QueryResult};
pub use executor::{
    execute_for_display, ExecutionOutcome, GatewayClient, GatewayConfig, QueryExecutor,
};
pub use render::{GraphqlRequest, QueryVariables, TagFilter};
