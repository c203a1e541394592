//! Permadash API Server
//!
//! Run with: cargo run --bin permadash
//!
//! Configuration is read from `$PERMADASH_CONFIG`, the user config dir,
//! `/etc/permadash/config.toml` or `./config.toml`, then overridden by
//! `PERMADASH_*` environment variables. `RUST_LOG` takes precedence over the
//! configured log level.

use anyhow::Context;
use permadash::api::{serve, AppState};
use permadash::config::{Config, LoggingConfig};
use permadash::credits::{CreditTimeline, HttpNoticeFetcher};
use permadash::delegation::{DelegationIndex, HttpDelegationSource};
use permadash::query::GatewayClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    init_tracing(&config.logging);

    tracing::info!("Starting Permadash API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Gateway: {}", config.gateway.url);
    tracing::info!("Credit notices: {}", config.credits.service_url);
    tracing::info!("Delegations: {}", config.delegation.service_url);

    let executor = Arc::new(
        GatewayClient::new(config.gateway.clone()).context("failed to build gateway client")?,
    );

    let fetcher = Arc::new(
        HttpNoticeFetcher::new(
            config.credits.service_url.clone(),
            config.credits.request_timeout_ms,
        )
        .context("failed to build credit-notice client")?,
    );
    if config.credits.process_id.is_empty() {
        tracing::warn!("credits.process_id is not set; credit timelines will be empty");
    }
    let credits = Arc::new(
        CreditTimeline::new(config.credits.process_id.clone(), fetcher)
            .with_ttl(config.credits.cache_ttl())
            .with_payment_methods(config.credits.payment_methods.clone()),
    );

    let source = Arc::new(
        HttpDelegationSource::new(
            config.delegation.service_url.clone(),
            config.delegation.page_size,
            config.delegation.request_timeout_ms,
        )
        .context("failed to build delegation client")?,
    );
    let delegations = Arc::new(DelegationIndex::new(source));

    if config.delegation.refresh_on_start {
        let index = Arc::clone(&delegations);
        tokio::spawn(async move {
            if let Err(e) = index.refresh().await {
                tracing::debug!("Startup delegation refresh failed: {}", e);
            }
        });
    }

    let registry = config.process_registry();
    tracing::info!("Process-id groups: {}", registry.groups().len());

    let state = AppState::new(
        executor,
        credits,
        delegations,
        registry,
        config.api.clone(),
    );

    serve(state).await.context("API server failed")?;

    tracing::info!("Permadash API server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("permadash={},tower_http=debug", logging.level))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
