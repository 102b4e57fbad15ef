//! Typed failures raised by the bias engine and the provider adapter.
//!
//! Every variant names the timeframe and field at fault so the transport
//! layer can turn it into a precise user-facing message.

use crate::types::Timeframe;

pub type Result<T> = std::result::Result<T, BiasError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BiasError {
    /// No daily snapshot was supplied; the engine refuses to score.
    #[error("daily snapshot is required")]
    MissingDaily,

    /// A required price field is absent from the upstream payload.
    #[error("{timeframe} snapshot is missing required field `{field}`")]
    MissingField {
        timeframe: Timeframe,
        field: &'static str,
    },

    /// `open` is the percentage-change denominator and must be non-zero.
    #[error("{timeframe} snapshot has open == 0")]
    ZeroOpen { timeframe: Timeframe },

    /// A scored field is NaN or infinite.
    #[error("{timeframe} snapshot field `{field}` is not a finite number")]
    NonFiniteField {
        timeframe: Timeframe,
        field: &'static str,
    },

    /// A scored field arrived from upstream as something other than a number.
    #[error("{timeframe} snapshot field `{field}` is not numeric: {raw}")]
    NonNumericField {
        timeframe: Timeframe,
        field: &'static str,
        raw: String,
    },
}
