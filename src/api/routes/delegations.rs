//! Delegation Routes
//!
//! - GET /api/v1/delegations - Totals and the breakdown of one project
//! - POST /api/v1/delegations/refresh - Reload the delegation snapshot

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{DelegationParams, DelegationRefreshResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::delegation::DelegationView;

/// GET /api/v1/delegations?project=
pub async fn get_delegations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DelegationParams>,
) -> ApiResult<Json<DelegationView>> {
    let project = params.project.as_deref().filter(|p| !p.is_empty());

    state
        .delegations
        .view(project)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::ServiceUnavailable("delegation data not loaded yet".to_string()))
}

/// POST /api/v1/delegations/refresh
pub async fn refresh_delegations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DelegationRefreshResponse>> {
    let accounts = state.delegations.refresh().await?;

    Ok(Json(DelegationRefreshResponse {
        status: "ok".to_string(),
        accounts,
    }))
}
