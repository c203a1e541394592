//! Credit Routes
//!
//! - GET /api/v1/payment-methods - Payment methods for the configured process
//! - GET /api/v1/credits/:payment_method - Credit timeline
//!
//! The timeline accepts `refresh=true` to bypass the fetch cache and
//! `format=json|chart|table`.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreditsData, CreditsParams, CreditsResponse, PaymentMethodsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::credits::{table_rows, CreditSeries, LoadOutcome};

/// GET /api/v1/payment-methods
pub async fn list_payment_methods(
    State(state): State<Arc<AppState>>,
) -> Json<PaymentMethodsResponse> {
    Json(PaymentMethodsResponse {
        process_id: state.credits.process_id().to_string(),
        payment_methods: state.credits.payment_methods().to_vec(),
    })
}

/// GET /api/v1/credits/:payment_method
///
/// Fetch failures are reported in `status`/`error` alongside whatever
/// timeline was retained, not as an HTTP error.
pub async fn get_credits(
    State(state): State<Arc<AppState>>,
    Path(payment_method): Path<String>,
    Query(params): Query<CreditsParams>,
) -> ApiResult<Json<CreditsResponse>> {
    let format = parse_format(params.format.as_deref())?;
    state.credits.check_payment_method(&payment_method)?;

    let outcome = state.credits.load(&payment_method, params.refresh).await;

    Ok(Json(to_response(
        state.credits.process_id(),
        outcome,
        format,
    )))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Chart,
    Table,
}

fn parse_format(format: Option<&str>) -> ApiResult<Format> {
    match format.map(str::to_lowercase).as_deref() {
        None | Some("json") => Ok(Format::Json),
        Some("chart") => Ok(Format::Chart),
        Some("table") => Ok(Format::Table),
        Some(other) => Err(ApiError::Validation(format!(
            "Invalid format: {}. Use json, chart, or table",
            other
        ))),
    }
}

fn to_response(process_id: &str, outcome: LoadOutcome, format: Format) -> CreditsResponse {
    let data = match format {
        Format::Json => CreditsData::Notices(outcome.notices),
        Format::Chart => CreditsData::Series(CreditSeries::from_notices(&outcome.notices)),
        Format::Table => CreditsData::Rows(table_rows(&outcome.notices)),
    };

    CreditsResponse {
        process_id: process_id.to_string(),
        payment_method: outcome.payment_method,
        status: outcome.status,
        last_fetched: outcome.last_fetched,
        error: outcome.error,
        data,
    }
}
