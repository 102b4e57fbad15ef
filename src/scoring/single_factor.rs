// =============================================================================
// Single-Factor Bias — close vs previous close
// =============================================================================
//
// A simpler alternative to the multi-factor scorer. It looks only at the
// price move and treats anything within ±epsilon as sideways. It is kept
// separate from the multi-factor scorer, whose comparisons default to exact
// equality.
// =============================================================================

use crate::types::Bias;

/// Tie band used by the single-factor call.
pub const DEFAULT_EPSILON: f64 = 0.0001;

/// Bullish / Bearish / Sideways from the move between two closes.
pub fn single_factor_bias(previous_close: f64, current_close: f64, epsilon: f64) -> Bias {
    let change = current_close - previous_close;
    if change > epsilon {
        Bias::Bullish
    } else if change < -epsilon {
        Bias::Bearish
    } else {
        Bias::Sideways
    }
}
