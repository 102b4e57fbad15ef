// =============================================================================
// Indicator Snapshot — one timeframe's technical readings
// =============================================================================
//
// Snapshots are fully resolved before they reach the engine: every secondary
// indicator already carries its documented default (RSI 50, MACD 0, EMAs =
// close, stochastics 50). The engine performs no defaulting of its own.
//
// Stochastic %K/%D are display-only. Upstream occasionally sends them as
// non-numeric placeholders, which are carried through untouched.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{BiasError, Result};
use crate::types::Timeframe;

pub const DEFAULT_RSI: f64 = 50.0;
pub const DEFAULT_MACD: f64 = 0.0;
pub const DEFAULT_MACD_SIGNAL: f64 = 0.0;
pub const DEFAULT_STOCH: f64 = 50.0;

/// A display-only reading: a number when upstream sent one, otherwise the raw
/// upstream value exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Raw(serde_json::Value),
}

impl Reading {
    /// Round numeric readings for display; raw values are never touched.
    pub fn rounded(&self, decimals: i32) -> Self {
        match self {
            Self::Number(v) => Self::Number(round_to(*v, decimals)),
            Self::Raw(raw) => Self::Raw(raw.clone()),
        }
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::Number(DEFAULT_STOCH)
    }
}

/// Immutable readings for a single timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timeframe: Timeframe,
    pub close: f64,
    /// Reference ("previous") price. Must be non-zero.
    pub open: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub stoch_k: Reading,
    pub stoch_d: Reading,
    /// Opaque upstream label, never used in scoring.
    pub recommendation: Option<String>,
}

impl IndicatorSnapshot {
    /// Build a snapshot from the two required prices with every secondary
    /// indicator at its documented default.
    pub fn new(timeframe: Timeframe, close: f64, open: f64) -> Self {
        Self {
            timeframe,
            close,
            open,
            rsi: DEFAULT_RSI,
            macd: DEFAULT_MACD,
            macd_signal: DEFAULT_MACD_SIGNAL,
            ema20: close,
            ema50: close,
            stoch_k: Reading::default(),
            stoch_d: Reading::default(),
            recommendation: None,
        }
    }

    pub fn with_rsi(mut self, rsi: f64) -> Self {
        self.rsi = rsi;
        self
    }

    pub fn with_macd(mut self, macd: f64, signal: f64) -> Self {
        self.macd = macd;
        self.macd_signal = signal;
        self
    }

    pub fn with_emas(mut self, ema20: f64, ema50: f64) -> Self {
        self.ema20 = ema20;
        self.ema50 = ema50;
        self
    }

    pub fn with_stochastics(mut self, stoch_k: Reading, stoch_d: Reading) -> Self {
        self.stoch_k = stoch_k;
        self.stoch_d = stoch_d;
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    /// Reject snapshots the engine cannot score: any non-finite scored field,
    /// or a zero `open`.
    pub fn validate(&self) -> Result<()> {
        let scored = [
            ("close", self.close),
            ("open", self.open),
            ("rsi", self.rsi),
            ("macd", self.macd),
            ("macd_signal", self.macd_signal),
            ("ema20", self.ema20),
            ("ema50", self.ema50),
        ];
        for (field, value) in scored {
            if !value.is_finite() {
                return Err(BiasError::NonFiniteField {
                    timeframe: self.timeframe,
                    field,
                });
            }
        }

        if self.open == 0.0 {
            return Err(BiasError::ZeroOpen {
                timeframe: self.timeframe,
            });
        }

        Ok(())
    }

    /// `(close - open) / open * 100`, rounded to two decimals.
    pub fn change_percentage(&self) -> Result<f64> {
        self.validate()?;
        let change = (self.close - self.open) / self.open * 100.0;
        Ok(round_to(change, 2))
    }

    /// Rounded copy of the indicator values for presentation.
    pub fn display(&self) -> IndicatorDisplay {
        IndicatorDisplay {
            rsi: round_to(self.rsi, 2),
            ema20: round_to(self.ema20, 4),
            ema50: round_to(self.ema50, 4),
            macd: round_to(self.macd, 4),
            macd_signal: round_to(self.macd_signal, 4),
            stoch_k: self.stoch_k.rounded(2),
            stoch_d: self.stoch_d.rounded(2),
        }
    }
}

/// Indicator values rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDisplay {
    pub rsi: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub stoch_k: Reading,
    pub stoch_d: Reading,
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
