// =============================================================================
// Provider Adapter — raw technical-analysis payloads → IndicatorSnapshot
// =============================================================================
//
// Upstream analysis arrives as a loose key/value map (`close`, `open`, `RSI`,
// `MACD.macd`, `MACD.signal`, `EMA20`, `EMA50`, `Stoch.K`, `Stoch.D`) plus a
// summary map carrying `RECOMMENDATION`. This module is the only place where
// documented defaults are applied:
//
//   RSI → 50    MACD / signal → 0    EMA20 / EMA50 → close    Stoch → 50
//
// Scored fields must coerce to a number (JSON numbers or numeric strings);
// anything else fails the call. Stochastics are display-only and keep
// non-numeric values untouched. `null` is treated as absent.
// =============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BiasError, Result};
use crate::snapshot::{IndicatorSnapshot, Reading, DEFAULT_MACD, DEFAULT_MACD_SIGNAL, DEFAULT_RSI};
use crate::types::Timeframe;

pub const KEY_CLOSE: &str = "close";
pub const KEY_OPEN: &str = "open";
pub const KEY_RSI: &str = "RSI";
pub const KEY_MACD: &str = "MACD.macd";
pub const KEY_MACD_SIGNAL: &str = "MACD.signal";
pub const KEY_EMA20: &str = "EMA20";
pub const KEY_EMA50: &str = "EMA50";
pub const KEY_STOCH_K: &str = "Stoch.K";
pub const KEY_STOCH_D: &str = "Stoch.D";
pub const KEY_RECOMMENDATION: &str = "RECOMMENDATION";

/// One timeframe of upstream technical analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeframeAnalysis {
    #[serde(default)]
    pub indicators: HashMap<String, Value>,
    #[serde(default)]
    pub summary: HashMap<String, Value>,
}

impl TimeframeAnalysis {
    fn get(&self, key: &str) -> Option<&Value> {
        self.indicators.get(key).filter(|v| !v.is_null())
    }

    /// Upstream returned nothing usable for this timeframe.
    pub fn is_empty(&self) -> bool {
        self.get(KEY_CLOSE).is_none()
    }
}

fn coerce(timeframe: Timeframe, field: &'static str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| BiasError::NonNumericField {
        timeframe,
        field,
        raw: value.to_string(),
    })
}

fn required(analysis: &TimeframeAnalysis, timeframe: Timeframe, key: &'static str) -> Result<f64> {
    let value = analysis
        .get(key)
        .ok_or(BiasError::MissingField { timeframe, field: key })?;
    coerce(timeframe, key, value)
}

fn optional(
    analysis: &TimeframeAnalysis,
    timeframe: Timeframe,
    key: &'static str,
) -> Result<Option<f64>> {
    analysis
        .get(key)
        .map(|value| coerce(timeframe, key, value))
        .transpose()
}

fn reading(analysis: &TimeframeAnalysis, key: &str) -> Reading {
    match analysis.get(key) {
        None => Reading::default(),
        Some(Value::Number(n)) => n.as_f64().map(Reading::Number).unwrap_or_default(),
        Some(raw) => Reading::Raw(raw.clone()),
    }
}

fn recommendation(analysis: &TimeframeAnalysis) -> Option<String> {
    match analysis.summary.get(KEY_RECOMMENDATION)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Resolve a raw analysis into a fully defaulted, validated snapshot.
pub fn resolve_snapshot(timeframe: Timeframe, analysis: &TimeframeAnalysis) -> Result<IndicatorSnapshot> {
    let close = required(analysis, timeframe, KEY_CLOSE)?;
    let open = required(analysis, timeframe, KEY_OPEN)?;

    let snapshot = IndicatorSnapshot {
        timeframe,
        close,
        open,
        rsi: optional(analysis, timeframe, KEY_RSI)?.unwrap_or(DEFAULT_RSI),
        macd: optional(analysis, timeframe, KEY_MACD)?.unwrap_or(DEFAULT_MACD),
        macd_signal: optional(analysis, timeframe, KEY_MACD_SIGNAL)?.unwrap_or(DEFAULT_MACD_SIGNAL),
        ema20: optional(analysis, timeframe, KEY_EMA20)?.unwrap_or(close),
        ema50: optional(analysis, timeframe, KEY_EMA50)?.unwrap_or(close),
        stoch_k: reading(analysis, KEY_STOCH_K),
        stoch_d: reading(analysis, KEY_STOCH_D),
        recommendation: recommendation(analysis),
    };
    snapshot.validate()?;
    Ok(snapshot)
}

/// The daily analysis is mandatory.
pub fn resolve_daily(analysis: Option<&TimeframeAnalysis>) -> Result<IndicatorSnapshot> {
    let analysis = analysis.ok_or(BiasError::MissingDaily)?;
    resolve_snapshot(Timeframe::Daily, analysis)
}

/// An absent or empty weekly analysis is a normal degraded input and yields
/// `Ok(None)`. A weekly analysis that has a close but is otherwise broken is
/// still an error.
pub fn resolve_weekly(analysis: Option<&TimeframeAnalysis>) -> Result<Option<IndicatorSnapshot>> {
    match analysis {
        Some(a) if !a.is_empty() => resolve_snapshot(Timeframe::Weekly, a).map(Some),
        _ => Ok(None),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis(indicators: Value) -> TimeframeAnalysis {
        serde_json::from_value(json!({ "indicators": indicators })).unwrap()
    }

    #[test]
    fn full_payload_resolves() {
        let a: TimeframeAnalysis = serde_json::from_value(json!({
            "indicators": {
                "close": 1.10, "open": 1.05, "RSI": 65.0,
                "MACD.macd": 0.002, "MACD.signal": 0.001,
                "EMA20": 1.08, "EMA50": 1.06,
                "Stoch.K": 82.5, "Stoch.D": 79.1
            },
            "summary": { "RECOMMENDATION": "STRONG_BUY" }
        }))
        .unwrap();
        let snap = resolve_snapshot(Timeframe::Daily, &a).unwrap();
        assert_eq!(snap.close, 1.10);
        assert_eq!(snap.open, 1.05);
        assert_eq!(snap.rsi, 65.0);
        assert_eq!(snap.macd, 0.002);
        assert_eq!(snap.macd_signal, 0.001);
        assert_eq!(snap.ema20, 1.08);
        assert_eq!(snap.ema50, 1.06);
        assert_eq!(snap.stoch_k, Reading::Number(82.5));
        assert_eq!(snap.recommendation.as_deref(), Some("STRONG_BUY"));
    }

    #[test]
    fn missing_secondary_indicators_take_defaults() {
        let snap = resolve_snapshot(Timeframe::Daily, &analysis(json!({ "close": 1.3, "open": 1.2 })))
            .unwrap();
        assert_eq!(snap.rsi, 50.0);
        assert_eq!(snap.macd, 0.0);
        assert_eq!(snap.macd_signal, 0.0);
        assert_eq!(snap.ema20, 1.3);
        assert_eq!(snap.ema50, 1.3);
        assert_eq!(snap.stoch_k, Reading::Number(50.0));
        assert_eq!(snap.stoch_d, Reading::Number(50.0));
        assert!(snap.recommendation.is_none());
    }

    #[test]
    fn null_is_treated_as_absent() {
        let snap = resolve_snapshot(
            Timeframe::Daily,
            &analysis(json!({ "close": 1.3, "open": 1.2, "RSI": null, "EMA20": null })),
        )
        .unwrap();
        assert_eq!(snap.rsi, 50.0);
        assert_eq!(snap.ema20, 1.3);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let snap = resolve_snapshot(
            Timeframe::Daily,
            &analysis(json!({ "close": "1.3", "open": " 1.2 ", "RSI": "61.5" })),
        )
        .unwrap();
        assert_eq!(snap.close, 1.3);
        assert_eq!(snap.open, 1.2);
        assert_eq!(snap.rsi, 61.5);
    }

    #[test]
    fn non_numeric_scored_field_is_rejected() {
        let err = resolve_snapshot(
            Timeframe::Daily,
            &analysis(json!({ "close": 1.3, "open": 1.2, "MACD.macd": "n/a" })),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BiasError::NonNumericField {
                timeframe: Timeframe::Daily,
                field: KEY_MACD,
                raw: "\"n/a\"".to_string(),
            }
        );
    }

    #[test]
    fn non_numeric_stochastics_pass_through() {
        let snap = resolve_snapshot(
            Timeframe::Daily,
            &analysis(json!({ "close": 1.3, "open": 1.2, "Stoch.K": "--", "Stoch.D": [1, 2] })),
        )
        .unwrap();
        assert_eq!(snap.stoch_k, Reading::Raw(json!("--")));
        assert_eq!(snap.stoch_d, Reading::Raw(json!([1, 2])));
    }

    #[test]
    fn missing_open_is_reported() {
        let err = resolve_snapshot(Timeframe::Daily, &analysis(json!({ "close": 1.3 }))).unwrap_err();
        assert_eq!(
            err,
            BiasError::MissingField {
                timeframe: Timeframe::Daily,
                field: KEY_OPEN,
            }
        );
    }

    #[test]
    fn zero_open_is_reported() {
        let err = resolve_snapshot(Timeframe::Weekly, &analysis(json!({ "close": 1.3, "open": 0 })))
            .unwrap_err();
        assert_eq!(
            err,
            BiasError::ZeroOpen {
                timeframe: Timeframe::Weekly
            }
        );
    }

    #[test]
    fn absent_daily_is_an_error() {
        assert_eq!(resolve_daily(None), Err(BiasError::MissingDaily));
    }

    #[test]
    fn absent_or_empty_weekly_is_degraded() {
        assert_eq!(resolve_weekly(None), Ok(None));
        assert_eq!(resolve_weekly(Some(&TimeframeAnalysis::default())), Ok(None));
        assert_eq!(resolve_weekly(Some(&analysis(json!({ "close": null })))), Ok(None));
    }

    #[test]
    fn broken_weekly_is_still_an_error() {
        let a = analysis(json!({ "close": 1.3 }));
        assert!(resolve_weekly(Some(&a)).is_err());
    }
}
