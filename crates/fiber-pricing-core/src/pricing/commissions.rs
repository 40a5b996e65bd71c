//! Multi-party sales commissions.
//!
//! Commissions are paid on the full contract value (monthly price x term),
//! or, for an existing client upgrading a service, only on the incremental
//! revenue over the fee the client already pays.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::rates::{CommissionTableKind, CommissionTables};
use crate::pricing::input::CalculationInput;
use crate::types::{clamp_money, pct, Money, Months, Percent};

/// Absolute commission per payee role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    /// Contract-level revenue the rates are applied to
    pub base: Money,
    /// Monthly value used to pick the partner revenue bracket
    pub bracket_value: Money,
    /// Which table paid the seller line (seller or channel seller)
    pub seller_table: CommissionTableKind,
    pub seller: Money,
    pub director: Money,
    pub indicator: Money,
    pub influencer: Money,
    pub total: Money,
    /// Tables that should have paid a line but had no rate for it
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<CommissionTableKind>,
}

/// Contract-level commission base, floored at zero. The monthly amount is
/// capped at `MAX_MONEY` before scaling by the term.
pub fn commission_base(
    resolved_monthly_price: Money,
    contract_term: Months,
    input: &CalculationInput,
) -> Money {
    let monthly = if input.is_upsell() {
        upsell_increment(resolved_monthly_price, input)
    } else {
        clamp_money(resolved_monthly_price)
    };
    monthly * Decimal::from(contract_term)
}

/// Monthly value used as the revenue-bracket key for partner tables.
pub fn bracket_value(resolved_monthly_price: Money, input: &CalculationInput) -> Money {
    if input.is_existing_client {
        upsell_increment(resolved_monthly_price, input)
    } else {
        clamp_money(resolved_monthly_price)
    }
}

fn upsell_increment(resolved_monthly_price: Money, input: &CalculationInput) -> Money {
    (clamp_money(resolved_monthly_price) - clamp_money(input.previous_monthly_fee))
        .max(Decimal::ZERO)
}

/// Compute every commission line for one contract term.
///
/// Exactly one of seller / channel seller is paid: the channel table applies
/// whenever a partner is attached. The director line is independent of the
/// partner flags. Indicator and influencer lines are only paid when their
/// partner is attached. A missing rate pays 0 for that line.
pub fn compute_commissions(
    resolved_monthly_price: Money,
    contract_term: Months,
    input: &CalculationInput,
    tables: &CommissionTables,
) -> CommissionBreakdown {
    let base = commission_base(resolved_monthly_price, contract_term, input);
    let bracket = bracket_value(resolved_monthly_price, input);
    let mut unresolved = Vec::new();

    let mut line = |kind: CommissionTableKind, rate: Option<Percent>| -> Money {
        match rate {
            Some(r) => base * pct(r),
            None => {
                tracing::warn!(table = ?kind, term = contract_term, "no commission rate; paying 0");
                unresolved.push(kind);
                Decimal::ZERO
            }
        }
    };

    let (seller_table, seller_rate) = if input.has_partner() {
        (
            CommissionTableKind::ChannelSeller,
            tables.channel_seller.rate_for(contract_term),
        )
    } else {
        (
            CommissionTableKind::Seller,
            tables.seller.rate_for(contract_term),
        )
    };
    let seller = line(seller_table, seller_rate);

    let director = if tables.channel_director.is_empty() {
        Decimal::ZERO
    } else {
        line(
            CommissionTableKind::ChannelDirector,
            tables.channel_director.rate_for(contract_term),
        )
    };

    let indicator = if input.include_referral_partner {
        line(
            CommissionTableKind::ChannelIndicator,
            tables.channel_indicator.rate_for(bracket, contract_term),
        )
    } else {
        Decimal::ZERO
    };

    let influencer = if input.include_influencer_partner {
        line(
            CommissionTableKind::ChannelInfluencer,
            tables.channel_influencer.rate_for(bracket, contract_term),
        )
    } else {
        Decimal::ZERO
    };

    let total = seller + director + indicator + influencer;
    tracing::debug!(%base, %total, term = contract_term, "commissions resolved");

    CommissionBreakdown {
        base,
        bracket_value: bracket,
        seller_table,
        seller,
        director,
        indicator,
        influencer,
        total,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::rates::TermRateTable;
    use crate::types::MAX_MONEY;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direct_sale_uses_seller_table() {
        let tables = CommissionTables::default();
        let input = CalculationInput::new(100, 12);
        let c = compute_commissions(dec!(1000), 12, &input, &tables);

        assert_eq!(c.base, dec!(12000));
        assert_eq!(c.seller_table, CommissionTableKind::Seller);
        // 12000 * 1.2% and 12000 * 0.3%
        assert_eq!(c.seller, dec!(144));
        assert_eq!(c.director, dec!(36));
        assert_eq!(c.indicator, Decimal::ZERO);
        assert_eq!(c.influencer, Decimal::ZERO);
        assert_eq!(c.total, dec!(180));
        assert!(c.unresolved.is_empty());
    }

    #[test]
    fn test_partner_sale_uses_channel_seller_only() {
        let tables = CommissionTables::default();
        let input = CalculationInput {
            include_referral_partner: true,
            ..CalculationInput::new(100, 24)
        };
        let c = compute_commissions(dec!(1000), 24, &input, &tables);

        assert_eq!(c.seller_table, CommissionTableKind::ChannelSeller);
        // 24000 * 1.2%
        assert_eq!(c.seller, dec!(288));
        // bracket 1000 @ 24 months = 3.0%
        assert_eq!(c.indicator, dec!(720));
        assert_eq!(c.influencer, Decimal::ZERO);
        assert_eq!(c.total, c.seller + c.director + c.indicator);
    }

    #[test]
    fn test_influencer_line_mirrors_indicator() {
        let tables = CommissionTables::default();
        let input = CalculationInput {
            include_influencer_partner: true,
            ..CalculationInput::new(100, 36)
        };
        let c = compute_commissions(dec!(600), 36, &input, &tables);
        // 600 * 36 = 21600; bracket 500 @ 36 = 2.5%
        assert_eq!(c.influencer, dec!(540));
        assert_eq!(c.indicator, Decimal::ZERO);
    }

    #[test]
    fn test_existing_client_base_is_incremental() {
        let tables = CommissionTables::default();
        let input = CalculationInput {
            is_existing_client: true,
            previous_monthly_fee: dec!(700),
            include_referral_partner: true,
            ..CalculationInput::new(100, 12)
        };
        let c = compute_commissions(dec!(1000), 12, &input, &tables);
        assert_eq!(c.base, dec!(3600));
        // bracket keyed on the monthly increment (300), not the base
        assert_eq!(c.bracket_value, dec!(300));
        assert_eq!(c.indicator, dec!(3600) * dec!(0.015));
    }

    #[test]
    fn test_existing_client_base_floors_at_zero() {
        let tables = CommissionTables::default();
        let input = CalculationInput {
            is_existing_client: true,
            previous_monthly_fee: dec!(1500),
            include_referral_partner: true,
            include_influencer_partner: true,
            ..CalculationInput::new(100, 12)
        };
        let c = compute_commissions(dec!(1000), 12, &input, &tables);
        assert_eq!(c.base, Decimal::ZERO);
        assert_eq!(c.bracket_value, Decimal::ZERO);
        assert_eq!(c.seller, Decimal::ZERO);
        assert_eq!(c.director, Decimal::ZERO);
        assert_eq!(c.indicator, Decimal::ZERO);
        assert_eq!(c.influencer, Decimal::ZERO);
        assert_eq!(c.total, Decimal::ZERO);
    }

    #[test]
    fn test_missing_rates_pay_zero() {
        let tables = CommissionTables {
            seller: TermRateTable::default(),
            channel_director: TermRateTable::default(),
            ..CommissionTables::default()
        };
        let input = CalculationInput::new(100, 12);
        let c = compute_commissions(dec!(1000), 12, &input, &tables);
        assert_eq!(c.total, Decimal::ZERO);
        // empty director table is not an unresolved line
        assert_eq!(c.unresolved, vec![CommissionTableKind::Seller]);

        let c = compute_commissions(dec!(1000), 18, &input, &CommissionTables::default());
        assert_eq!(c.total, Decimal::ZERO);
        assert_eq!(
            c.unresolved,
            vec![CommissionTableKind::Seller, CommissionTableKind::ChannelDirector]
        );
    }

    #[test]
    fn test_huge_price_is_capped_instead_of_overflowing() {
        let tables = CommissionTables::default();
        let input = CalculationInput {
            include_referral_partner: true,
            include_influencer_partner: true,
            ..CalculationInput::new(100, 60)
        };
        let c = compute_commissions(Decimal::MAX / dec!(10), 60, &input, &tables);
        assert_eq!(c.base, MAX_MONEY * dec!(60));
        assert_eq!(c.bracket_value, MAX_MONEY);
        assert_eq!(c.total, c.seller + c.director + c.indicator + c.influencer);
    }
}
