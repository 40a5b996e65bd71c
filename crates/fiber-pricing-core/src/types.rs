use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages on the 0-100 scale (15 = 15%). Divided by 100 at the point of use.
pub type Percent = Decimal;

/// Contract terms and payback horizons, in whole months.
pub type Months = u32;

/// Plan speed in Mbps.
pub type Mbps = u32;

/// Contract-term buckets reported by the DRE, shortest first.
pub const CONTRACT_TERMS: [Months; 5] = [12, 24, 36, 48, 60];

/// Longest contract the proposal pipeline and payback walk accept.
pub const MAX_CONTRACT_TERM: Months = 120;

/// Ceiling for any single money amount entering the engine. Products with
/// speeds, terms, rates and the last-mile multiplier stay inside `Decimal` range.
pub const MAX_MONEY: Money = dec!(1000000000000000);

/// Convert a 0-100 percentage into a multiplier fraction.
pub fn pct(value: Percent) -> Decimal {
    value / dec!(100)
}

/// `numerator / denominator`, or zero when the denominator is zero or the
/// quotient does not fit in a `Decimal`.
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
    }
}

/// `numerator / denominator` on the 0-100 scale, zero-guarded like [`ratio_or_zero`].
pub fn percent_of(numerator: Decimal, denominator: Decimal) -> Percent {
    ratio_or_zero(numerator, denominator)
        .checked_mul(dec!(100))
        .unwrap_or(Decimal::ZERO)
}

/// Clamp a percentage into [0, 100].
pub fn clamp_percent(value: Percent) -> Percent {
    value.max(Decimal::ZERO).min(dec!(100))
}

/// Clamp a money amount into [0, `MAX_MONEY`].
pub fn clamp_money(value: Money) -> Money {
    value.max(Decimal::ZERO).min(MAX_MONEY)
}

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_or_zero_guards_division() {
        assert_eq!(ratio_or_zero(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(ratio_or_zero(dec!(10), dec!(4)), dec!(2.5));
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(dec!(-5)), Decimal::ZERO);
        assert_eq!(clamp_percent(dec!(150)), dec!(100));
        assert_eq!(clamp_percent(dec!(15)), dec!(15));
    }

    #[test]
    fn test_percent_of_overflow_is_zero() {
        assert_eq!(percent_of(dec!(1), dec!(4)), dec!(25));
        assert_eq!(percent_of(Decimal::MAX, dec!(0.0000001)), Decimal::ZERO);
        assert_eq!(percent_of(Decimal::MAX / dec!(10), Decimal::ONE), Decimal::ZERO);
    }

    #[test]
    fn test_clamp_money() {
        assert_eq!(clamp_money(dec!(-1)), Decimal::ZERO);
        assert_eq!(clamp_money(Decimal::MAX), MAX_MONEY);
        assert_eq!(clamp_money(dec!(20248)), dec!(20248));
    }
}
