//! Process Id Routes
//!
//! - GET /api/v1/process-ids - Configured process ids, grouped

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::ProcessIdsResponse;
use crate::api::state::AppState;

/// GET /api/v1/process-ids
pub async fn list_process_ids(State(state): State<Arc<AppState>>) -> Json<ProcessIdsResponse> {
    Json(ProcessIdsResponse {
        groups: state.process_ids.groups(),
    })
}
