// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The service never fetches market data:
// callers POST the technical analysis they already hold and receive the bias
// computed from it. Symbols are echoed exactly as given.
//
// CORS is configured permissively for development.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::error::BiasError;
use crate::provider::{self, TimeframeAnalysis};
use crate::runtime_config::{RuntimeConfig, TradingPair};
use crate::scoring::BiasResult;
use crate::types::Direction;

const DEFAULT_HISTORY_LIMIT: usize = 50;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/pairs", get(pairs))
        .route("/api/v1/market-bias", post(market_bias))
        .route("/api/v1/history", get(history))
        .route("/api/v1/config", get(get_config).post(update_config))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Presentation
// =============================================================================

/// Display icon for a direction.
pub fn direction_icon(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "📈",
        Direction::Down => "📉",
        Direction::Neutral => "🔁",
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
    uptime_secs: u64,
    evaluations: u64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: Utc::now().timestamp_millis(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        evaluations: state.evaluation_count(),
    })
}

// =============================================================================
// Supported pairs
// =============================================================================

async fn pairs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let pairs = state.runtime_config.read().pairs.clone();
    Json(pairs)
}

// =============================================================================
// Market bias
// =============================================================================

fn default_symbol() -> String {
    "EURUSD".to_string()
}

#[derive(Debug, Deserialize)]
struct MarketBiasRequest {
    #[serde(default = "default_symbol")]
    symbol: String,
    #[serde(default)]
    daily: Option<TimeframeAnalysis>,
    #[serde(default)]
    weekly: Option<TimeframeAnalysis>,
}

#[derive(Serialize)]
struct MarketBiasResponse {
    status: &'static str,
    id: String,
    symbol: String,
    icon: &'static str,
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    result: BiasResult,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
}

fn error_response(message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        status: "error",
        message: message.into(),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

/// Malformed or mistyped bodies get the same envelope as scoring errors.
fn rejection_response(rejection: JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "request body rejected");
    error_response(rejection.body_text())
}

fn evaluate_request(state: &AppState, req: &MarketBiasRequest) -> Result<BiasResult, BiasError> {
    let daily = provider::resolve_daily(req.daily.as_ref())?;
    let weekly = provider::resolve_weekly(req.weekly.as_ref())?;
    if weekly.is_none() {
        debug!(symbol = %req.symbol, "weekly data unavailable — scoring daily only");
    }
    state.scorer.evaluate(Some(&daily), weekly.as_ref())
}

async fn market_bias(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MarketBiasRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection),
    };
    info!(symbol = %req.symbol, weekly = req.weekly.is_some(), "market bias requested");

    match evaluate_request(&state, &req) {
        Ok(result) => {
            let record = state.history.record(req.symbol.clone(), result);
            state.increment_evaluations();
            info!(
                symbol = %record.symbol,
                bias = %record.result.bias,
                strength = %record.result.strength,
                score = record.result.score,
                "bias determined"
            );
            Json(MarketBiasResponse {
                status: "success",
                icon: direction_icon(record.result.direction),
                id: record.id,
                symbol: record.symbol,
                timestamp: record.timestamp,
                result: record.result,
            })
            .into_response()
        }
        Err(e) => {
            warn!(symbol = %req.symbol, error = %e, "market bias rejected");
            error_response(e.to_string())
        }
    }
}

// =============================================================================
// History
// =============================================================================

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

async fn history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let records = state.history.recent(query.symbol.as_deref(), limit);
    Json(records)
}

// =============================================================================
// Runtime config
// =============================================================================

async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.runtime_config.read().clone();
    Json(config)
}

/// Fields a client may change at runtime. Scoring weights and the bind
/// address are fixed at startup.
#[derive(Debug, Deserialize)]
struct ConfigUpdate {
    #[serde(default)]
    pairs: Option<Vec<TradingPair>>,
    #[serde(default)]
    history_capacity: Option<usize>,
}

impl ConfigUpdate {
    fn validate(&self) -> Result<(), String> {
        if self.history_capacity == Some(0) {
            return Err("history_capacity must be > 0".to_string());
        }
        if let Some(pairs) = &self.pairs {
            if pairs.iter().any(|p| p.symbol.trim().is_empty()) {
                return Err("pair symbols must not be empty".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ConfigResponse {
    status: &'static str,
    persisted: bool,
    #[serde(flatten)]
    config: RuntimeConfig,
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConfigUpdate>, JsonRejection>,
) -> Response {
    let update = match payload {
        Ok(Json(update)) => update,
        Err(rejection) => return rejection_response(rejection),
    };
    if let Err(message) = update.validate() {
        warn!(error = %message, "config update rejected");
        return error_response(message);
    }

    // The write lock is held through the save so concurrent updates reach
    // disk in the order they were applied.
    let mut config = state.runtime_config.write();
    let mut changes: Vec<&'static str> = Vec::new();

    if let Some(pairs) = update.pairs {
        if pairs != config.pairs {
            config.pairs = pairs;
            changes.push("pairs");
        }
    }
    if let Some(capacity) = update.history_capacity {
        if capacity != config.history_capacity {
            config.history_capacity = capacity;
            state.history.set_capacity(capacity);
            changes.push("history_capacity");
        }
    }

    let mut persisted = false;
    if !changes.is_empty() {
        info!(
            changes = ?changes,
            pairs = config.pairs.len(),
            history_capacity = config.history_capacity,
            "runtime config updated"
        );
        if let Some(path) = &state.config_path {
            match config.save(path) {
                Ok(()) => persisted = true,
                Err(e) => warn!(path = %path.display(), error = %e, "failed to persist runtime config"),
            }
        }
    }

    Json(ConfigResponse {
        status: "success",
        persisted,
        config: config.clone(),
    })
    .into_response()
}
