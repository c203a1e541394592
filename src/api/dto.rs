//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::credits::{AggregatedNotice, CreditRow, CreditSeries, LoadStatus, PaymentMethod};
use crate::process_ids::ProcessIdGroup;
use crate::query::{GraphqlRequest, QueryDescriptor, QueryFields, QueryFilters};

// ============================================
// QUERY DTOs
// ============================================

/// Query builder form state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildQueryRequest {
    #[serde(default)]
    pub filters: QueryFilters,
    #[serde(default)]
    pub fields: QueryFields,
    /// Zero or below means no limit
    #[serde(default)]
    pub limit: i64,
}

/// A built query in every form the dashboard shows
#[derive(Debug, Serialize)]
pub struct BuildQueryResponse {
    pub descriptor: QueryDescriptor,
    /// GraphQL document text
    pub graphql: String,
    /// Request body sent to the gateway
    pub request: GraphqlRequest,
    /// Copy-to-clipboard text
    pub pretty: String,
}

// ============================================
// CREDITS DTOs
// ============================================

/// Query parameters for a credit timeline
#[derive(Debug, Default, Deserialize)]
pub struct CreditsParams {
    /// Bypass the fetch cache
    #[serde(default)]
    pub refresh: bool,
    /// json (default), chart or table
    #[serde(default)]
    pub format: Option<String>,
}

/// Payment methods offered for the configured process
#[derive(Debug, Serialize)]
pub struct PaymentMethodsResponse {
    pub process_id: String,
    pub payment_methods: Vec<PaymentMethod>,
}

/// Credit timeline response
#[derive(Debug, Serialize)]
pub struct CreditsResponse {
    pub process_id: String,
    pub payment_method: String,
    pub status: LoadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fetched: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: CreditsData,
}

/// Timeline body in the requested shape
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditsData {
    Notices(Vec<AggregatedNotice>),
    Series(CreditSeries),
    Rows(Vec<CreditRow>),
}

// ============================================
// DELEGATION DTOs
// ============================================

/// Query parameters for the delegation view
#[derive(Debug, Default, Deserialize)]
pub struct DelegationParams {
    /// Project to break down; defaults to the first project
    #[serde(default)]
    pub project: Option<String>,
}

/// Delegation refresh response
#[derive(Debug, Serialize, Deserialize)]
pub struct DelegationRefreshResponse {
    pub status: String,
    pub accounts: usize,
}

// ============================================
// PROCESS ID DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct ProcessIdsResponse {
    pub groups: Vec<ProcessIdGroup>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded, unhealthy
    pub status: String,
    /// Credit timeline: open or closed
    pub credits: String,
    /// Delegation snapshot: loaded or pending
    pub delegations: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
