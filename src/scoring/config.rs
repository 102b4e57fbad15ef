// =============================================================================
// Scoring Configuration — named weights and thresholds
// =============================================================================
//
// Every constant the scorer uses lives here. All fields carry
// `#[serde(default = "...")]` so a partial JSON block only overrides what it
// names. `validate` rejects values that would break the tie-scores-zero rule
// or the threshold ordering.
// =============================================================================

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

pub const PRICE_ACTION_WEIGHT: i32 = 40;
pub const TREND_STRONG_WEIGHT: i32 = 30;
pub const TREND_MODERATE_WEIGHT: i32 = 15;
pub const MOMENTUM_STRONG_WEIGHT: i32 = 20;
pub const MOMENTUM_MODERATE_WEIGHT: i32 = 10;
pub const MACD_WEIGHT: i32 = 10;

pub const RSI_STRONG_BULLISH: f64 = 60.0;
pub const RSI_STRONG_BEARISH: f64 = 40.0;
pub const RSI_MIDLINE: f64 = 50.0;

pub const STRONG_THRESHOLD: f64 = 50.0;
pub const MODERATE_THRESHOLD: f64 = 20.0;
pub const CONFLICT_THRESHOLD: i32 = 30;

pub const DAILY_WEIGHT: f64 = 0.7;
pub const WEEKLY_WEIGHT: f64 = 0.3;

fn default_price_action_weight() -> i32 {
    PRICE_ACTION_WEIGHT
}

fn default_trend_strong_weight() -> i32 {
    TREND_STRONG_WEIGHT
}

fn default_trend_moderate_weight() -> i32 {
    TREND_MODERATE_WEIGHT
}

fn default_momentum_strong_weight() -> i32 {
    MOMENTUM_STRONG_WEIGHT
}

fn default_momentum_moderate_weight() -> i32 {
    MOMENTUM_MODERATE_WEIGHT
}

fn default_macd_weight() -> i32 {
    MACD_WEIGHT
}

fn default_rsi_strong_bullish() -> f64 {
    RSI_STRONG_BULLISH
}

fn default_rsi_strong_bearish() -> f64 {
    RSI_STRONG_BEARISH
}

fn default_rsi_midline() -> f64 {
    RSI_MIDLINE
}

fn default_strong_threshold() -> f64 {
    STRONG_THRESHOLD
}

fn default_moderate_threshold() -> f64 {
    MODERATE_THRESHOLD
}

fn default_conflict_threshold() -> i32 {
    CONFLICT_THRESHOLD
}

fn default_daily_weight() -> f64 {
    DAILY_WEIGHT
}

fn default_weekly_weight() -> f64 {
    WEEKLY_WEIGHT
}

/// Weights, RSI levels and classification thresholds for the bias scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    // --- Component weights --------------------------------------------------

    /// Added or subtracted on the sign of `close - open`.
    #[serde(default = "default_price_action_weight")]
    pub price_action_weight: i32,

    /// close > EMA20 > EMA50 (or the mirror).
    #[serde(default = "default_trend_strong_weight")]
    pub trend_strong_weight: i32,

    /// close on one side of EMA20 without full stack alignment.
    #[serde(default = "default_trend_moderate_weight")]
    pub trend_moderate_weight: i32,

    #[serde(default = "default_momentum_strong_weight")]
    pub momentum_strong_weight: i32,

    #[serde(default = "default_momentum_moderate_weight")]
    pub momentum_moderate_weight: i32,

    #[serde(default = "default_macd_weight")]
    pub macd_weight: i32,

    // --- RSI levels ---------------------------------------------------------

    #[serde(default = "default_rsi_strong_bullish")]
    pub rsi_strong_bullish: f64,

    #[serde(default = "default_rsi_strong_bearish")]
    pub rsi_strong_bearish: f64,

    #[serde(default = "default_rsi_midline")]
    pub rsi_midline: f64,

    // --- Classification -----------------------------------------------------

    /// |score| at or beyond this is a strong bias.
    #[serde(default = "default_strong_threshold")]
    pub strong_threshold: f64,

    /// |score| at or beyond this (and below strong) is a moderate bias.
    #[serde(default = "default_moderate_threshold")]
    pub moderate_threshold: f64,

    /// Daily and weekly scores strictly beyond ±this in opposite directions
    /// mark the result as conflicted.
    #[serde(default = "default_conflict_threshold")]
    pub conflict_threshold: i32,

    // --- Timeframe blending -------------------------------------------------

    /// Applied to the daily score only when a weekly score is present.
    #[serde(default = "default_daily_weight")]
    pub daily_weight: f64,

    #[serde(default = "default_weekly_weight")]
    pub weekly_weight: f64,

    // --- Comparisons --------------------------------------------------------

    /// Differences within ±tolerance compare as equal. Zero means exact
    /// equality.
    #[serde(default)]
    pub comparison_tolerance: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            price_action_weight: PRICE_ACTION_WEIGHT,
            trend_strong_weight: TREND_STRONG_WEIGHT,
            trend_moderate_weight: TREND_MODERATE_WEIGHT,
            momentum_strong_weight: MOMENTUM_STRONG_WEIGHT,
            momentum_moderate_weight: MOMENTUM_MODERATE_WEIGHT,
            macd_weight: MACD_WEIGHT,
            rsi_strong_bullish: RSI_STRONG_BULLISH,
            rsi_strong_bearish: RSI_STRONG_BEARISH,
            rsi_midline: RSI_MIDLINE,
            strong_threshold: STRONG_THRESHOLD,
            moderate_threshold: MODERATE_THRESHOLD,
            conflict_threshold: CONFLICT_THRESHOLD,
            daily_weight: DAILY_WEIGHT,
            weekly_weight: WEEKLY_WEIGHT,
            comparison_tolerance: 0.0,
        }
    }
}

impl ScoringConfig {
    /// Check the configuration is usable by the scorer.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.comparison_tolerance.is_finite() && self.comparison_tolerance >= 0.0,
            "comparison_tolerance must be finite and >= 0, got {}",
            self.comparison_tolerance
        );

        let weights = [
            ("price_action_weight", self.price_action_weight),
            ("trend_strong_weight", self.trend_strong_weight),
            ("trend_moderate_weight", self.trend_moderate_weight),
            ("momentum_strong_weight", self.momentum_strong_weight),
            ("momentum_moderate_weight", self.momentum_moderate_weight),
            ("macd_weight", self.macd_weight),
        ];
        for (name, weight) in weights {
            ensure!(weight >= 0, "{name} must be >= 0, got {weight}");
        }

        let levels = [
            ("rsi_strong_bullish", self.rsi_strong_bullish),
            ("rsi_strong_bearish", self.rsi_strong_bearish),
            ("rsi_midline", self.rsi_midline),
            ("strong_threshold", self.strong_threshold),
            ("moderate_threshold", self.moderate_threshold),
            ("daily_weight", self.daily_weight),
            ("weekly_weight", self.weekly_weight),
        ];
        for (name, value) in levels {
            ensure!(value.is_finite(), "{name} must be finite, got {value}");
        }

        ensure!(
            self.rsi_strong_bearish <= self.rsi_midline && self.rsi_midline <= self.rsi_strong_bullish,
            "RSI levels must satisfy strong_bearish <= midline <= strong_bullish"
        );
        ensure!(
            self.moderate_threshold > 0.0 && self.moderate_threshold <= self.strong_threshold,
            "thresholds must satisfy 0 < moderate_threshold <= strong_threshold"
        );
        ensure!(
            self.conflict_threshold >= 0,
            "conflict_threshold must be >= 0, got {}",
            self.conflict_threshold
        );
        ensure!(
            self.daily_weight >= 0.0 && self.weekly_weight >= 0.0,
            "timeframe weights must be >= 0"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_named_constants() {
        let cfg = ScoringConfig::default();
        assert_eq!(cfg.price_action_weight, 40);
        assert_eq!(cfg.trend_strong_weight, 30);
        assert_eq!(cfg.trend_moderate_weight, 15);
        assert_eq!(cfg.momentum_strong_weight, 20);
        assert_eq!(cfg.momentum_moderate_weight, 10);
        assert_eq!(cfg.macd_weight, 10);
        assert_eq!(cfg.conflict_threshold, 30);
        assert!((cfg.daily_weight - 0.7).abs() < f64::EPSILON);
        assert!((cfg.weekly_weight - 0.3).abs() < f64::EPSILON);
        assert_eq!(cfg.comparison_tolerance, 0.0);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let cfg: ScoringConfig =
            serde_json::from_str(r#"{ "comparison_tolerance": -0.5 }"#).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("comparison_tolerance"));
    }

    #[test]
    fn non_finite_tolerance_is_rejected() {
        let cfg = ScoringConfig {
            comparison_tolerance: f64::NAN,
            ..ScoringConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let cfg = ScoringConfig {
            moderate_threshold: 60.0,
            strong_threshold: 50.0,
            ..ScoringConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ScoringConfig {
            moderate_threshold: 0.0,
            ..ScoringConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_finite_levels_and_negative_weights_are_rejected() {
        let cfg = ScoringConfig {
            weekly_weight: f64::INFINITY,
            ..ScoringConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ScoringConfig {
            macd_weight: -10,
            ..ScoringConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ScoringConfig {
            rsi_strong_bearish: 55.0,
            ..ScoringConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_json_uses_defaults() {
        let cfg: ScoringConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ScoringConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let cfg: ScoringConfig =
            serde_json::from_str(r#"{ "comparison_tolerance": 0.0001, "strong_threshold": 60 }"#)
                .unwrap();
        assert_eq!(cfg.comparison_tolerance, 0.0001);
        assert_eq!(cfg.strong_threshold, 60.0);
        assert_eq!(cfg.moderate_threshold, 20.0);
        assert_eq!(cfg.price_action_weight, 40);
    }
}
