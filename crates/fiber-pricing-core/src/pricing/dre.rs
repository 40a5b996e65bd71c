//! DRE (Demonstrativo de Resultado do Exercício): per-term profit and loss.
//!
//! Every bucket reuses the monthly price resolved at the *selected* contract
//! term and scales it by the bucket's duration, while commission rates are
//! looked up at the bucket's own term. The two terms differ on purpose: the
//! columns answer "what would this deal look like over N months".

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::plans::PlanTier;
use crate::catalog::rates::CommissionTables;
use crate::pricing::commissions::compute_commissions;
use crate::pricing::discounts::{resolve_before_last_mile, resolve_monthly_price};
use crate::pricing::input::CalculationInput;
use crate::pricing::payback::{simulate_payback, PaybackParams};
use crate::types::{clamp_money, pct, percent_of, Money, Months, Percent, CONTRACT_TERMS};

/// Profit-and-loss statement for one contract-term bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrePeriod {
    pub months: Months,
    pub monthly_value: Money,
    pub total_revenue: Money,
    pub installation_revenue: Money,
    pub combined_revenue: Money,
    pub bandwidth_cost: Money,
    pub fiber_cost: Money,
    pub last_mile_cost: Money,
    pub national_tax: Money,
    pub seller_commission: Money,
    pub director_commission: Money,
    pub indicator_commission: Money,
    pub influencer_commission: Money,
    pub total_commissions: Money,
    pub overhead_cost: Money,
    pub total_cost: Money,
    /// Net profit
    pub balance: Money,
    pub margin_pct: Percent,
    pub markup_pct: Percent,
    /// Rentabilidade: balance over fiber cost
    pub profitability_pct: Percent,
    pub payback_months: Months,
}

/// Payback inputs for a given monthly revenue, term and commission total.
pub(crate) fn payback_params(
    plan: &PlanTier,
    input: &CalculationInput,
    monthly_revenue: Money,
    contract_term: Months,
    total_commissions: Money,
) -> PaybackParams {
    let taxes = input.tax_rates();
    PaybackParams {
        installation_fee: installation_revenue(plan, input),
        upfront_investment: clamp_money(plan.fiber_cost),
        monthly_revenue,
        contract_term,
        speed_mbps: plan.speed,
        national_tax_pct: taxes.national_tax_pct,
        overhead_pct: taxes.overhead_pct,
        banda_cost_per_mbps: taxes.banda_cost_per_mbps,
        create_last_mile: input.create_last_mile,
        last_mile_multiplier: input.last_mile_multiplier,
        total_commissions,
    }
}

pub(crate) fn installation_revenue(plan: &PlanTier, input: &CalculationInput) -> Money {
    if input.include_installation {
        clamp_money(plan.installation_cost)
    } else {
        Decimal::ZERO
    }
}

/// Build the statement for a single bucket of `months`.
///
/// The input is clamped with [`CalculationInput::normalized`]; a missing tax
/// override means the built-in default rates.
pub fn build_dre_for_period(
    months: Months,
    plan: &PlanTier,
    input: &CalculationInput,
    tables: &CommissionTables,
) -> DrePeriod {
    let input = &input.normalized();
    let taxes = input.tax_rates();
    let base_price = plan.price_for(input.contract_term);
    let monthly_value = resolve_monthly_price(base_price, input);
    let months_dec = Decimal::from(months);

    let total_revenue = monthly_value * months_dec;
    let installation_revenue = installation_revenue(plan, input);
    let combined_revenue = total_revenue + installation_revenue;

    let (bandwidth_cost, last_mile_cost) = if input.create_last_mile {
        let without_last_mile = resolve_before_last_mile(base_price, input);
        (
            Decimal::ZERO,
            ((monthly_value - without_last_mile) * months_dec).max(Decimal::ZERO),
        )
    } else {
        (
            Decimal::from(plan.speed) * taxes.banda_cost_per_mbps * months_dec,
            Decimal::ZERO,
        )
    };
    let fiber_cost = clamp_money(plan.fiber_cost);
    let national_tax = combined_revenue * pct(taxes.national_tax_pct);
    let commissions = compute_commissions(monthly_value, months, input, tables);
    let overhead_cost = combined_revenue * pct(taxes.overhead_pct);

    let total_cost = bandwidth_cost
        + fiber_cost
        + last_mile_cost
        + national_tax
        + commissions.total
        + overhead_cost;
    let balance = combined_revenue
        - fiber_cost
        - bandwidth_cost
        - last_mile_cost
        - national_tax
        - commissions.total
        - overhead_cost;

    let margin_pct = percent_of(balance, combined_revenue);
    let markup_pct = percent_of(combined_revenue - total_cost, total_cost);
    let profitability_pct = percent_of(balance, fiber_cost);

    let payback_months = simulate_payback(&payback_params(
        plan,
        input,
        monthly_value,
        months,
        commissions.total,
    ));

    DrePeriod {
        months,
        monthly_value,
        total_revenue,
        installation_revenue,
        combined_revenue,
        bandwidth_cost,
        fiber_cost,
        last_mile_cost,
        national_tax,
        seller_commission: commissions.seller,
        director_commission: commissions.director,
        indicator_commission: commissions.indicator,
        influencer_commission: commissions.influencer,
        total_commissions: commissions.total,
        overhead_cost,
        total_cost,
        balance,
        margin_pct,
        markup_pct,
        profitability_pct,
        payback_months,
    }
}

/// Statements for the 12/24/36/48/60-month buckets, shortest first.
pub fn build_dre(
    plan: &PlanTier,
    input: &CalculationInput,
    tables: &CommissionTables,
) -> Vec<DrePeriod> {
    CONTRACT_TERMS
        .iter()
        .map(|&months| build_dre_for_period(months, plan, input, tables))
        .collect()
}
