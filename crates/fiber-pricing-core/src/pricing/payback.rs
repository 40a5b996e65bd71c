//! Month-by-month payback simulation.
//!
//! Month 0 books the installation fee (net of tax and overhead) against the
//! upfront fiber investment. Each following month adds the net monthly
//! cash flow; the whole commission is debited in month 1.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::discounts::effective_last_mile_multiplier;
use crate::types::{clamp_money, clamp_percent, pct, Mbps, Money, Months, Percent, MAX_CONTRACT_TERM};

/// Inputs to the payback walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaybackParams {
    pub installation_fee: Money,
    /// Upfront investment (the plan's fiber cost)
    pub upfront_investment: Money,
    pub monthly_revenue: Money,
    pub contract_term: Months,
    pub speed_mbps: Mbps,
    pub national_tax_pct: Percent,
    pub overhead_pct: Percent,
    pub banda_cost_per_mbps: Money,
    #[serde(default)]
    pub create_last_mile: bool,
    #[serde(default = "default_multiplier")]
    pub last_mile_multiplier: Decimal,
    pub total_commissions: Money,
}

fn default_multiplier() -> Decimal {
    crate::pricing::input::DEFAULT_LAST_MILE_MULTIPLIER
}

impl PaybackParams {
    /// Clamp every field into range: percentages to [0, 100], money to
    /// [0, `MAX_MONEY`], the term to `MAX_CONTRACT_TERM` and the last-mile
    /// multiplier as for proposals. The walk and schedule always run on this.
    pub fn normalized(&self) -> Self {
        Self {
            installation_fee: clamp_money(self.installation_fee),
            upfront_investment: clamp_money(self.upfront_investment),
            monthly_revenue: clamp_money(self.monthly_revenue),
            contract_term: self.contract_term.min(MAX_CONTRACT_TERM),
            national_tax_pct: clamp_percent(self.national_tax_pct),
            overhead_pct: clamp_percent(self.overhead_pct),
            banda_cost_per_mbps: clamp_money(self.banda_cost_per_mbps),
            last_mile_multiplier: effective_last_mile_multiplier(self.last_mile_multiplier),
            total_commissions: clamp_money(self.total_commissions),
            ..self.clone()
        }
    }
}

/// Payback check against the maximum allowed for the term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaybackValidation {
    pub is_valid: bool,
    pub actual_payback: Months,
    pub max_payback: Months,
    /// False when the balance never turned non-negative within the term.
    /// `actual_payback` is then reported as the full term.
    pub recovered: bool,
}

/// One month of the cash-flow projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowMonth {
    pub month: Months,
    pub net_flow: Money,
    pub cumulative: Money,
}

/// Maximum acceptable payback for a contract term.
pub fn max_payback_months(term: Months) -> Months {
    match term {
        12 => 8,
        24 => 10,
        36 => 11,
        48 => 13,
        60 => 14,
        other => other / 2,
    }
}

/// Balance after month 0: installation fee net of its tax and overhead,
/// minus the upfront investment.
pub fn opening_balance(params: &PaybackParams) -> Money {
    let fee = params.installation_fee;
    -params.upfront_investment + fee
        - fee * pct(params.national_tax_pct)
        - fee * pct(params.overhead_pct)
}

/// Net cash flow of month `month` (1-based).
pub fn monthly_net_flow(params: &PaybackParams, month: Months) -> Money {
    let revenue = params.monthly_revenue;
    let national_tax = revenue * pct(params.national_tax_pct);
    let overhead = revenue * pct(params.overhead_pct);
    let commissions = if month == 1 {
        params.total_commissions
    } else {
        Decimal::ZERO
    };
    revenue - access_cost(params) - national_tax - commissions - overhead
}

/// Monthly bandwidth cost, or the last-mile pass-through when a last mile is provisioned.
fn access_cost(params: &PaybackParams) -> Money {
    let revenue = params.monthly_revenue;
    if params.create_last_mile {
        let multiplier = effective_last_mile_multiplier(params.last_mile_multiplier);
        // a multiplier below 1 has no pass-through; tiny ones overflow the division
        revenue
            .checked_div(multiplier)
            .map_or(Decimal::ZERO, |net| (revenue - net).max(Decimal::ZERO))
    } else {
        Decimal::from(params.speed_mbps) * params.banda_cost_per_mbps
    }
}

/// First month at which the cumulative balance is non-negative, with a
/// flag telling whether it actually happened within the term.
fn walk(params: &PaybackParams) -> (Months, bool) {
    let params = &params.normalized();
    let mut balance = opening_balance(params);
    if balance >= Decimal::ZERO {
        return (0, true);
    }
    if params.monthly_revenue <= Decimal::ZERO {
        return (params.contract_term, false);
    }

    for month in 1..=params.contract_term {
        balance += monthly_net_flow(params, month);
        if balance >= Decimal::ZERO {
            return (month, true);
        }
    }
    (params.contract_term, false)
}

/// Months until the investment is recovered.
///
/// Never exceeds the contract term: a contract that never recovers reports
/// the full term.
pub fn simulate_payback(params: &PaybackParams) -> Months {
    let (months, recovered) = walk(params);
    tracing::debug!(months, recovered, term = params.contract_term, "payback simulated");
    months
}

pub fn validate_payback(params: &PaybackParams) -> PaybackValidation {
    let (actual_payback, recovered) = walk(params);
    let max_payback = max_payback_months(params.contract_term.min(MAX_CONTRACT_TERM));
    PaybackValidation {
        // Months is unsigned, so the lower bound always holds.
        is_valid: actual_payback <= max_payback,
        actual_payback,
        max_payback,
        recovered,
    }
}

/// Full month-by-month projection from month 0 to the end of the term.
pub fn cash_flow_schedule(params: &PaybackParams) -> Vec<CashFlowMonth> {
    let params = &params.normalized();
    let opening = opening_balance(params);
    let mut schedule = Vec::with_capacity(params.contract_term as usize + 1);
    schedule.push(CashFlowMonth {
        month: 0,
        net_flow: opening,
        cumulative: opening,
    });

    let mut cumulative = opening;
    for month in 1..=params.contract_term {
        let net_flow = monthly_net_flow(params, month);
        cumulative += net_flow;
        schedule.push(CashFlowMonth {
            month,
            net_flow,
            cumulative,
        });
    }
    schedule
}
