// =============================================================================
// Market Bias — Main Entry Point
// =============================================================================
//
// Loads configuration, starts the HTTP API and waits for Ctrl+C. The service
// holds no market data of its own; clients POST the analysis to score.
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use market_bias::api;
use market_bias::app_state::AppState;
use market_bias::runtime_config::RuntimeConfig;

const DEFAULT_CONFIG_PATH: &str = "runtime_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Market Bias service starting up");

    let config_path =
        std::env::var("MARKET_BIAS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(addr) = std::env::var("MARKET_BIAS_BIND_ADDR") {
        config.bind_addr = addr;
    }

    info!(
        bind_addr = %config.bind_addr,
        history_capacity = config.history_capacity,
        comparison_tolerance = config.scoring.comparison_tolerance,
        "Configuration resolved"
    );

    // ── 2. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config).with_config_path(&config_path));

    // ── 3. API server ────────────────────────────────────────────────────
    let app = api::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!(
        evaluations = state.evaluation_count(),
        "Market Bias service shut down complete."
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
