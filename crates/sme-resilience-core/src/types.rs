use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::SimulatorError;
use crate::SimulatorResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates and fractions expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Values on a 0-100 point scale (scores, impact potentials, scope reductions).
pub type Points = Decimal;

const SCORE_MIN: Decimal = dec!(0);
const SCORE_MAX: Decimal = dec!(100);

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round half away from zero to `dp` decimal places.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp a score-like value into [0, 100].
pub fn clamp_score(score: Decimal) -> Decimal {
    if score < SCORE_MIN {
        SCORE_MIN
    } else if score > SCORE_MAX {
        SCORE_MAX
    } else {
        score
    }
}

// ---------------------------------------------------------------------------
// Checked arithmetic
// ---------------------------------------------------------------------------

/// Turns the `None` of a `checked_*` operation into `ArithmeticOverflow`.
pub trait OrOverflow<T> {
    fn or_overflow(self, context: &str) -> SimulatorResult<T>;
}

impl<T> OrOverflow<T> for Option<T> {
    fn or_overflow(self, context: &str) -> SimulatorResult<T> {
        self.ok_or_else(|| SimulatorError::ArithmeticOverflow {
            context: context.to_string(),
        })
    }
}

/// Sum that fails instead of panicking when the total leaves the decimal range.
pub fn checked_sum<I>(values: I, context: &str) -> SimulatorResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).or_overflow(context)
    })
}

/// Checked `sum(value * weight)`.
pub fn weighted_sum(terms: &[(Decimal, Decimal)], context: &str) -> SimulatorResult<Decimal> {
    terms.iter().try_fold(Decimal::ZERO, |acc, &(value, weight)| {
        value
            .checked_mul(weight)
            .and_then(|term| acc.checked_add(term))
            .or_overflow(context)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_midpoint_goes_away_from_zero() {
        assert_eq!(round_to(dec!(37.95), 1), dec!(38.0));
        assert_eq!(round_to(dec!(2.5), 0), dec!(3));
        assert_eq!(round_to(dec!(-2.5), 0), dec!(-3));
        assert_eq!(round_to(dec!(1203.556), 1), dec!(1203.6));
    }

    #[test]
    fn test_checked_sum_reports_overflow() {
        assert_eq!(checked_sum([dec!(1), dec!(2.5)], "total").unwrap(), dec!(3.5));
        let err = checked_sum([Decimal::MAX, Decimal::ONE], "total").unwrap_err();
        assert!(matches!(
            err,
            SimulatorError::ArithmeticOverflow { ref context } if context == "total"
        ));
    }

    #[test]
    fn test_weighted_sum() {
        let terms = [(dec!(10), dec!(0.4)), (dec!(20), dec!(0.6))];
        assert_eq!(weighted_sum(&terms, "blend").unwrap(), dec!(16));
        assert!(weighted_sum(&[(Decimal::MAX, dec!(2))], "blend").is_err());
    }

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score(dec!(-4)), dec!(0));
        assert_eq!(clamp_score(dec!(140.5)), dec!(100));
        assert_eq!(clamp_score(dec!(42)), dec!(42));
    }
}
