use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fiber_pricing_core::pricing::input::{CalculationInput, TaxRates, DEFAULT_LAST_MILE_MULTIPLIER};
use fiber_pricing_core::pricing::proposal;
use fiber_pricing_core::PricingConfig;

use crate::input;

/// Proposal parameters shared by `quote` and `dre`
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProposalArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Plan speed in Mbps (e.g. 600)
    #[arg(long)]
    pub speed: Option<u32>,

    /// Contract term in months (12, 24, 36, 48 or 60)
    #[arg(long, default_value = "12")]
    pub term: u32,

    /// Charge the plan's installation fee
    #[arg(long)]
    pub installation: bool,

    /// Apply the fixed 5% salesperson discount
    #[arg(long)]
    pub salesperson_discount: bool,

    /// Director discount in percent (e.g. 15)
    #[arg(long)]
    pub director_discount: Option<Decimal>,

    /// Attach a referral (indicator) partner
    #[arg(long)]
    pub referral: bool,

    /// Attach an influencer partner
    #[arg(long)]
    pub influencer: bool,

    /// Monthly fee the existing client pays today; marks the deal as an upsell
    #[arg(long)]
    pub previous_fee: Option<Decimal>,

    /// Provision a third-party last mile
    #[arg(long)]
    pub last_mile: bool,

    /// Last-mile price multiplier
    #[arg(long)]
    pub last_mile_multiplier: Option<Decimal>,

    /// National simplified tax in percent (overrides config)
    #[arg(long)]
    pub national_tax: Option<Decimal>,

    /// Overhead in percent of revenue (overrides config)
    #[arg(long)]
    pub overhead: Option<Decimal>,

    /// Bandwidth cost per Mbps per month (overrides config)
    #[arg(long)]
    pub banda_cost: Option<Decimal>,
}

impl ProposalArgs {
    fn taxes(&self, defaults: &TaxRates) -> TaxRates {
        TaxRates {
            national_tax_pct: self.national_tax.unwrap_or(defaults.national_tax_pct),
            banda_cost_per_mbps: self.banda_cost.unwrap_or(defaults.banda_cost_per_mbps),
            overhead_pct: self.overhead.unwrap_or(defaults.overhead_pct),
        }
    }
}

/// Build the calculation input from a JSON file, piped stdin, or flags.
///
/// JSON inputs without a `taxes` section take the tax flags, falling back
/// to the loaded configuration's rates.
pub fn resolve_input(
    args: &ProposalArgs,
    config: &PricingConfig,
) -> Result<CalculationInput, Box<dyn std::error::Error>> {
    let json = if let Some(ref path) = args.input {
        Some(input::file::read_json_value(path)?)
    } else {
        input::stdin::read_stdin()?
    };

    if let Some(data) = json {
        let mut calc_input: CalculationInput = serde_json::from_value(data)?;
        if calc_input.taxes.is_none() {
            calc_input.taxes = Some(args.taxes(&config.taxes));
        }
        return Ok(calc_input);
    }

    let speed = args.speed.ok_or("--speed is required (or provide --input)")?;
    Ok(CalculationInput {
        speed,
        contract_term: args.term,
        include_installation: args.installation,
        apply_salesperson_discount: args.salesperson_discount,
        director_discount_percentage: args.director_discount.unwrap_or(Decimal::ZERO),
        include_referral_partner: args.referral,
        include_influencer_partner: args.influencer,
        is_existing_client: args.previous_fee.is_some(),
        previous_monthly_fee: args.previous_fee.unwrap_or(Decimal::ZERO),
        create_last_mile: args.last_mile,
        last_mile_multiplier: args
            .last_mile_multiplier
            .unwrap_or(DEFAULT_LAST_MILE_MULTIPLIER),
        taxes: Some(args.taxes(&config.taxes)),
    })
}

pub fn run_quote(
    args: ProposalArgs,
    config: &PricingConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input = resolve_input(&args, config)?;
    let result = proposal::calculate_proposal(config, &calc_input)?;
    Ok(serde_json::to_value(result)?)
}
