use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::PricingConfig;
use crate::error::PricingError;
use crate::pricing::commissions::{compute_commissions, CommissionBreakdown};
use crate::pricing::discounts::resolve_monthly_price;
use crate::pricing::dre::{build_dre, build_dre_for_period, installation_revenue, payback_params, DrePeriod};
use crate::pricing::input::CalculationInput;
use crate::pricing::payback::{cash_flow_schedule, validate_payback, CashFlowMonth, PaybackValidation};
use crate::types::{with_metadata, ComputationOutput, Mbps, Money, Months, Percent, MAX_CONTRACT_TERM};
use crate::PricingResult;

/// Pricing of the selected plan at the selected contract term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub speed: Mbps,
    pub contract_term: Months,
    /// Catalog price before discounts, markup and last mile
    pub base_price: Money,
    /// Post-discount, post-partner-markup, post-last-mile monthly price
    pub monthly_price: Money,
    /// Installation charged on this proposal (0 when not included)
    pub installation_cost: Money,
    pub fiber_cost: Money,
    pub commissions: CommissionBreakdown,
    pub payback: PaybackValidation,
    pub cash_flow: Vec<CashFlowMonth>,
}

/// Headline figures for the selected term plus the best DRE buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub contract_term: Months,
    pub monthly_price: Money,
    /// Monthly price x term + installation
    pub contract_value: Money,
    pub total_commissions: Money,
    pub balance: Money,
    pub margin_pct: Percent,
    pub profitability_pct: Percent,
    pub payback_months: Months,
    pub payback_valid: bool,
    pub best_margin_months: Months,
    pub best_profitability_months: Months,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalOutput {
    pub result: CalculationResult,
    pub dre: Vec<DrePeriod>,
    pub summary: ExecutiveSummary,
}

/// Run the full pipeline for one proposal.
///
/// Resolves the monthly price, commissions and payback at the selected
/// term, then builds the five DRE buckets and the executive summary.
/// An input without its own tax rates uses `config.taxes`.
pub fn calculate_proposal(
    config: &PricingConfig,
    input: &CalculationInput,
) -> PricingResult<ComputationOutput<ProposalOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.contract_term == 0 || input.contract_term > MAX_CONTRACT_TERM {
        return Err(PricingError::UnsupportedTerm {
            term: input.contract_term,
        });
    }
    let input = config.resolve_input(input);
    let plan = config.plans.get(input.speed)?;
    let term = input.contract_term;

    let base_price = plan.price_for(term);
    if base_price.is_zero() {
        warnings.push(format!(
            "{} Mbps plan has no price for a {term}-month contract; monthly price is 0",
            plan.speed
        ));
    }
    let monthly_price = resolve_monthly_price(base_price, &input);
    tracing::debug!(speed = plan.speed, term, %base_price, %monthly_price, "monthly price resolved");

    let commissions = compute_commissions(monthly_price, term, &input, &config.commissions);
    for table in &commissions.unresolved {
        warnings.push(format!(
            "No {table:?} commission rate for a {term}-month contract; line paid as 0"
        ));
    }
    if input.is_upsell() && commissions.base.is_zero() {
        warnings.push(format!(
            "Existing client: new monthly price {monthly_price} does not exceed current fee {}; no commissions paid",
            input.previous_monthly_fee
        ));
    }

    let params = payback_params(plan, &input, monthly_price, term, commissions.total);
    let payback = validate_payback(&params);
    if !payback.recovered {
        warnings.push(format!(
            "Investment not recovered within {term} months; payback reported as the full term"
        ));
    }
    if !payback.is_valid {
        warnings.push(format!(
            "Payback of {} months exceeds the {}-month maximum for a {term}-month contract",
            payback.actual_payback, payback.max_payback
        ));
    }

    let result = CalculationResult {
        speed: plan.speed,
        contract_term: term,
        base_price,
        monthly_price,
        installation_cost: installation_revenue(plan, &input),
        fiber_cost: plan.fiber_cost,
        commissions,
        payback,
        cash_flow: cash_flow_schedule(&params),
    };

    let dre = build_dre(plan, &input, &config.commissions);
    let selected = build_dre_for_period(term, plan, &input, &config.commissions);
    if selected.balance < Decimal::ZERO {
        warnings.push(format!(
            "Negative balance of {} over the {term}-month contract",
            selected.balance.round_dp(2)
        ));
    }
    let summary = summarize(&result, &selected, &dre);

    let output = ProposalOutput {
        result,
        dre,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Fiber proposal: tiered discounts, commission tables, payback walk and per-term DRE",
        &input,
        warnings,
        elapsed,
        output,
    ))
}

fn summarize(result: &CalculationResult, selected: &DrePeriod, dre: &[DrePeriod]) -> ExecutiveSummary {
    ExecutiveSummary {
        contract_term: result.contract_term,
        monthly_price: result.monthly_price,
        contract_value: result.monthly_price * Decimal::from(result.contract_term)
            + result.installation_cost,
        total_commissions: result.commissions.total,
        balance: selected.balance,
        margin_pct: selected.margin_pct,
        profitability_pct: selected.profitability_pct,
        payback_months: result.payback.actual_payback,
        payback_valid: result.payback.is_valid,
        best_margin_months: best_by(dre, |p| p.margin_pct),
        best_profitability_months: best_by(dre, |p| p.profitability_pct),
    }
}

/// Shortest bucket with the highest value of `key`.
fn best_by(dre: &[DrePeriod], key: impl Fn(&DrePeriod) -> Decimal) -> Months {
    dre.iter()
        .fold(None::<&DrePeriod>, |best, p| match best {
            Some(b) if key(b) >= key(p) => Some(b),
            _ => Some(p),
        })
        .map(|p| p.months)
        .unwrap_or_default()
}
