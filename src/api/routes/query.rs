//! Query Routes
//!
//! - POST /api/v1/query/build - Assemble a query from form state
//! - POST /api/v1/query/execute - Assemble and run it against the gateway

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{BuildQueryRequest, BuildQueryResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::query::{build_query, execute_for_display, ExecutionOutcome};

/// POST /api/v1/query/build
pub async fn build(Json(req): Json<BuildQueryRequest>) -> ApiResult<Json<BuildQueryResponse>> {
    let descriptor = build_query(&req.filters, &req.fields, req.limit);
    let pretty = descriptor.to_pretty_json()?;

    Ok(Json(BuildQueryResponse {
        graphql: descriptor.to_graphql(),
        request: descriptor.to_request(),
        pretty,
        descriptor,
    }))
}

/// POST /api/v1/query/execute
///
/// Gateway failures come back as `{"error": "..."}` with status 200 so the
/// result pane can show them in place of a response.
pub async fn execute(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BuildQueryRequest>,
) -> Json<ExecutionOutcome> {
    let descriptor = build_query(&req.filters, &req.fields, req.limit);
    let request = descriptor.to_request();

    tracing::debug!(
        predicates = descriptor.predicates.len(),
        fields = descriptor.fields.len(),
        "Executing query"
    );

    Json(execute_for_display(state.executor.as_ref(), &request).await)
}
