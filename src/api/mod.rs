//! Permadash REST API
//!
//! HTTP API layer for Permadash, built with Axum.
//!
//! # Endpoints
//!
//! ## Query
//! - `POST /api/v1/query/build` - Build a query from form state
//! - `POST /api/v1/query/execute` - Build and run a query
//!
//! ## Credits
//! - `GET /api/v1/payment-methods` - Configured payment methods
//! - `GET /api/v1/credits/:payment_method` - Credit timeline
//!
//! ## Delegations
//! - `GET /api/v1/delegations` - Delegation totals and breakdown
//! - `POST /api/v1/delegations/refresh` - Reload delegation data
//!
//! ## Process ids
//! - `GET /api/v1/process-ids` - Grouped process ids
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use crate::config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Query routes
        .route("/query/build", post(routes::query::build))
        .route("/query/execute", post(routes::query::execute))
        // Credit routes
        .route("/payment-methods", get(routes::credits::list_payment_methods))
        .route("/credits/:payment_method", get(routes::credits::get_credits))
        // Delegation routes
        .route("/delegations", get(routes::delegations::get_delegations))
        .route(
            "/delegations/refresh",
            post(routes::delegations::refresh_delegations),
        )
        // Process id routes
        .route("/process-ids", get(routes::process_ids::list_process_ids));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let timeout = state.config.request_timeout();
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
///
/// The credit timeline is closed once the server stops, so fetches still in
/// flight are discarded.
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let credits = Arc::clone(&state.credits);
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Permadash API listening on {}", addr);

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    credits.close();
    result.map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Permadash API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
