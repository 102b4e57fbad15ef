// =============================================================================
// Runtime Configuration — service settings with atomic save
// =============================================================================
//
// Central configuration for the market bias service: listen address,
// history retention, the instrument list offered to clients, and the full
// set of scoring weights and thresholds.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::scoring::ScoringConfig;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_history_capacity() -> usize {
    500
}

fn default_pairs() -> Vec<TradingPair> {
    [
        ("EURUSD", "Euro / US Dollar"),
        ("GBPUSD", "British Pound / US Dollar"),
        ("USDJPY", "US Dollar / Japanese Yen"),
        ("AUDUSD", "Australian Dollar / US Dollar"),
        ("USDCAD", "US Dollar / Canadian Dollar"),
        ("USDCHF", "US Dollar / Swiss Franc"),
        ("NZDUSD", "New Zealand Dollar / US Dollar"),
        ("XAUUSD", "Gold / US Dollar"),
        ("BTCUSD", "Bitcoin / US Dollar"),
    ]
    .into_iter()
    .map(|(symbol, name)| TradingPair {
        symbol: symbol.to_string(),
        name: name.to_string(),
    })
    .collect()
}

/// An instrument offered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPair {
    pub symbol: String,
    pub name: String,
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the market bias service.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the HTTP API binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Maximum number of bias records kept in memory.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Instruments listed by `GET /api/v1/pairs`.
    #[serde(default = "default_pairs")]
    pub pairs: Vec<TradingPair>,

    /// Weights and thresholds for the bias scorer.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            history_capacity: default_history_capacity(),
            pairs: default_pairs(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config
            .scoring
            .validate()
            .with_context(|| format!("invalid scoring config in {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            pairs = config.pairs.len(),
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}
