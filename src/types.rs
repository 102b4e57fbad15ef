// =============================================================================
// Shared types used across the market bias engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// Sampling granularity of an indicator snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
        }
    }
}

/// Categorical directional call for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bias {
    #[serde(rename = "Strong Bullish")]
    StrongBullish,
    Bullish,
    Sideways,
    Bearish,
    #[serde(rename = "Strong Bearish")]
    StrongBearish,
}

impl Bias {
    /// Direction implied by this bias. The mapping is fixed.
    pub fn direction(self) -> Direction {
        match self {
            Self::StrongBullish | Self::Bullish => Direction::Up,
            Self::Sideways => Direction::Neutral,
            Self::Bearish | Self::StrongBearish => Direction::Down,
        }
    }

    /// Strength before any cross-timeframe conflict override.
    pub fn base_strength(self) -> Strength {
        match self {
            Self::StrongBullish | Self::StrongBearish => Strength::Strong,
            Self::Bullish | Self::Bearish => Strength::Moderate,
            Self::Sideways => Strength::Weak,
        }
    }
}

impl std::fmt::Display for Bias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBullish => write!(f, "Strong Bullish"),
            Self::Bullish => write!(f, "Bullish"),
            Self::Sideways => write!(f, "Sideways"),
            Self::Bearish => write!(f, "Bearish"),
            Self::StrongBearish => write!(f, "Strong Bearish"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// How convincing the bias is. `Conflicted` is only ever produced by the
/// cross-timeframe conflict override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
    Conflicted,
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strong => write!(f, "strong"),
            Self::Moderate => write!(f, "moderate"),
            Self::Weak => write!(f, "weak"),
            Self::Conflicted => write!(f, "conflicted"),
        }
    }
}
