// =============================================================================
// Bias Scorer — combine, classify and flag cross-timeframe conflict
// =============================================================================
//
// Pipeline per call:
//
//   daily snapshot  ─┐
//                    ├─ score each ─ combine ─ classify ─ conflict override
//   weekly snapshot ─┘  (optional)
//
// Combination:
//   weekly present  → daily * 0.7 + weekly * 0.3
//   weekly absent   → daily, unscaled
//
// Classification (first match wins):
//   score >=  50 → Strong Bullish / up / strong
//   score >=  20 → Bullish / up / moderate
//   score <= -50 → Strong Bearish / down / strong
//   score <= -20 → Bearish / down / moderate
//   otherwise    → Sideways / neutral / weak
//
// Conflict (weekly present only) overrides strength, never bias/direction:
//   (daily > 30 AND weekly < -30) OR (daily < -30 AND weekly > 30)
//
// The scorer is stateless; every method takes `&self` and touches only its
// arguments.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{BiasError, Result};
use crate::scoring::config::ScoringConfig;
use crate::scoring::timeframe::{score_components, ScoreComponents};
use crate::snapshot::{round_to, IndicatorDisplay, IndicatorSnapshot};
use crate::types::{Bias, Direction, Strength};

/// Final output of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasResult {
    pub bias: Bias,
    pub direction: Direction,
    pub strength: Strength,
    /// Weighted composite score.
    pub score: f64,
    pub daily_score: i32,
    /// `None` when no weekly data was available.
    pub weekly_score: Option<i32>,
    /// Daily open, rounded to 4 dp.
    pub prev_price: f64,
    /// Daily close, rounded to 4 dp.
    pub current_price: f64,
    /// Daily change in percent, rounded to 2 dp.
    pub change_percentage: f64,
    pub weekly_change_percentage: Option<f64>,
    pub indicators: IndicatorDisplay,
    pub weekly_indicators: Option<IndicatorDisplay>,
    pub daily_recommendation: Option<String>,
    pub weekly_recommendation: Option<String>,
}

/// The multi-timeframe bias scoring engine.
#[derive(Debug, Clone, Default)]
pub struct BiasScorer {
    config: ScoringConfig,
}

impl BiasScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Component breakdown for one snapshot.
    pub fn score_components(&self, snapshot: &IndicatorSnapshot) -> Result<ScoreComponents> {
        score_components(snapshot, &self.config)
    }

    /// Integer score for one snapshot.
    pub fn score_timeframe(&self, snapshot: &IndicatorSnapshot) -> Result<i32> {
        Ok(self.score_components(snapshot)?.total())
    }

    /// Blend the daily score with the weekly score, if any. The daily weight
    /// is only applied when a weekly score exists.
    pub fn combine(&self, daily_score: i32, weekly_score: Option<i32>) -> f64 {
        match weekly_score {
            Some(weekly) => {
                daily_score as f64 * self.config.daily_weight
                    + weekly as f64 * self.config.weekly_weight
            }
            None => daily_score as f64,
        }
    }

    pub fn classify(&self, score: f64) -> Bias {
        let strong = self.config.strong_threshold;
        let moderate = self.config.moderate_threshold;
        if score >= strong {
            Bias::StrongBullish
        } else if score >= moderate {
            Bias::Bullish
        } else if score <= -strong {
            Bias::StrongBearish
        } else if score <= -moderate {
            Bias::Bearish
        } else {
            Bias::Sideways
        }
    }

    /// Daily and weekly scores point strongly in opposite directions.
    pub fn is_conflicted(&self, daily_score: i32, weekly_score: i32) -> bool {
        let t = self.config.conflict_threshold;
        (daily_score > t && weekly_score < -t) || (daily_score < -t && weekly_score > t)
    }

    /// Assemble the result from already-computed scores. The weekly score and
    /// its snapshot travel together; `None` selects daily-only mode.
    pub fn combine_and_classify(
        &self,
        daily_score: i32,
        daily: &IndicatorSnapshot,
        weekly: Option<(i32, &IndicatorSnapshot)>,
    ) -> Result<BiasResult> {
        let change_percentage = daily.change_percentage()?;
        let weekly_change_percentage = weekly
            .map(|(_, snapshot)| snapshot.change_percentage())
            .transpose()?;

        let weekly_score = weekly.map(|(score, _)| score);
        let score = self.combine(daily_score, weekly_score);
        let bias = self.classify(score);

        let strength = match weekly_score {
            Some(w) if self.is_conflicted(daily_score, w) => Strength::Conflicted,
            _ => bias.base_strength(),
        };

        Ok(BiasResult {
            bias,
            direction: bias.direction(),
            strength,
            score,
            daily_score,
            weekly_score,
            prev_price: round_to(daily.open, 4),
            current_price: round_to(daily.close, 4),
            change_percentage,
            weekly_change_percentage,
            indicators: daily.display(),
            weekly_indicators: weekly.map(|(_, snapshot)| snapshot.display()),
            daily_recommendation: daily.recommendation.clone(),
            weekly_recommendation: weekly.and_then(|(_, snapshot)| snapshot.recommendation.clone()),
        })
    }

    /// Score and classify in one call. A missing daily snapshot is an error;
    /// a missing weekly snapshot selects daily-only mode.
    pub fn evaluate(
        &self,
        daily: Option<&IndicatorSnapshot>,
        weekly: Option<&IndicatorSnapshot>,
    ) -> Result<BiasResult> {
        let daily = daily.ok_or(BiasError::MissingDaily)?;
        let daily_score = self.score_timeframe(daily)?;
        let weekly = match weekly {
            Some(snapshot) => Some((self.score_timeframe(snapshot)?, snapshot)),
            None => None,
        };
        self.combine_and_classify(daily_score, daily, weekly)
    }
}

/// Score one snapshot with the default configuration.
pub fn score_timeframe(snapshot: &IndicatorSnapshot) -> Result<i32> {
    BiasScorer::default().score_timeframe(snapshot)
}

/// Combine and classify with the default configuration.
pub fn combine_and_classify(
    daily_score: i32,
    daily: &IndicatorSnapshot,
    weekly: Option<(i32, &IndicatorSnapshot)>,
) -> Result<BiasResult> {
    BiasScorer::default().combine_and_classify(daily_score, daily, weekly)
}
