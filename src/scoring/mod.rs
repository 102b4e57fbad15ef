// =============================================================================
// Scoring Module
// =============================================================================
//
// Pure, deterministic market-bias scoring:
// - Named weights and thresholds
// - Four-component single-timeframe scorer
// - Daily/weekly combiner, classifier and conflict override
// - Single-factor close-vs-close alternative
//
// Nothing in here logs, performs I/O or holds state between calls.

pub mod config;
pub mod engine;
pub mod single_factor;
pub mod timeframe;

pub use config::ScoringConfig;
pub use engine::{combine_and_classify, score_timeframe, BiasResult, BiasScorer};
pub use single_factor::single_factor_bias;
pub use timeframe::ScoreComponents;
