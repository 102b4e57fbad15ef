// =============================================================================
// Market Bias — multi-timeframe directional bias from indicator snapshots
// =============================================================================
//
// The scoring engine (`scoring`) is pure and stateless. Everything around it
// (the provider adapter, history store and HTTP API) is a collaborator that
// feeds it snapshots or consumes its results.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod error;
pub mod history;
pub mod provider;
pub mod runtime_config;
pub mod scoring;
pub mod snapshot;
pub mod types;

pub use error::BiasError;
pub use scoring::{combine_and_classify, score_timeframe, BiasResult, BiasScorer, ScoringConfig};
pub use snapshot::{IndicatorSnapshot, Reading};
pub use types::{Bias, Direction, Strength, Timeframe};
