use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::pricing::input::{CalculationInput, DEFAULT_LAST_MILE_MULTIPLIER, SALESPERSON_DISCOUNT_PCT};
use crate::types::{clamp_money, pct, Money};

/// Markup applied when a referral or influencer partner is attached.
pub const PARTNER_MARKUP: Decimal = dec!(1.20);

const MAX_LAST_MILE_MULTIPLIER: Decimal = dec!(100);

/// Resolve the monthly price charged to the customer.
///
/// Steps run in a fixed order and are not commutative:
/// 1. salesperson discount (5%)
/// 2. director discount (variable %)
/// 3. partner markup (+20%) when either partner flag is set
/// 4. last-mile multiplier when a last mile is provisioned
pub fn resolve_monthly_price(base_price: Money, input: &CalculationInput) -> Money {
    apply_last_mile(resolve_before_last_mile(base_price, input), input)
}

/// Steps 1-3 of [`resolve_monthly_price`]: discounts and partner markup only.
/// The base price is clamped into [0, `MAX_MONEY`] first.
pub fn resolve_before_last_mile(base_price: Money, input: &CalculationInput) -> Money {
    let mut price = clamp_money(base_price);

    if input.apply_salesperson_discount {
        price *= Decimal::ONE - pct(SALESPERSON_DISCOUNT_PCT);
    }
    if input.director_discount_percentage > Decimal::ZERO {
        price *= Decimal::ONE - pct(input.director_discount_percentage);
    }
    if input.has_partner() {
        price *= PARTNER_MARKUP;
    }

    price
}

fn apply_last_mile(price: Money, input: &CalculationInput) -> Money {
    if input.create_last_mile {
        price * effective_last_mile_multiplier(input.last_mile_multiplier)
    } else {
        price
    }
}

/// Last-mile multiplier clamped to (0, 100]; non-positive values fall back to 1.75.
pub fn effective_last_mile_multiplier(multiplier: Decimal) -> Decimal {
    if multiplier <= Decimal::ZERO {
        DEFAULT_LAST_MILE_MULTIPLIER
    } else {
        multiplier.min(MAX_LAST_MILE_MULTIPLIER)
    }
}
