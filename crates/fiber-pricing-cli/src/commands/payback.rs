use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use fiber_pricing_core::pricing::input::DEFAULT_LAST_MILE_MULTIPLIER;
use fiber_pricing_core::pricing::payback::{self, PaybackParams};
use fiber_pricing_core::PricingConfig;

use crate::input;

/// Arguments for a payback simulation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaybackArgs {
    /// Path to JSON input file with payback parameters
    #[arg(long)]
    pub input: Option<String>,

    /// Installation fee charged upfront
    #[arg(long, default_value = "0")]
    pub installation_fee: Decimal,

    /// Upfront investment (fiber cost)
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Monthly revenue
    #[arg(long)]
    pub monthly_revenue: Option<Decimal>,

    /// Contract term in months
    #[arg(long, default_value = "12")]
    pub term: u32,

    /// Plan speed in Mbps
    #[arg(long, default_value = "0")]
    pub speed: u32,

    /// Total commissions debited in month 1
    #[arg(long, default_value = "0")]
    pub commissions: Decimal,

    /// Provision a third-party last mile
    #[arg(long)]
    pub last_mile: bool,

    /// Last-mile price multiplier
    #[arg(long)]
    pub last_mile_multiplier: Option<Decimal>,

    /// Include the month-by-month cash-flow schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_payback(
    args: PaybackArgs,
    config: &PricingConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let params: PaybackParams = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PaybackParams {
            installation_fee: args.installation_fee,
            upfront_investment: args
                .investment
                .ok_or("--investment is required (or provide --input)")?,
            monthly_revenue: args
                .monthly_revenue
                .ok_or("--monthly-revenue is required (or provide --input)")?,
            contract_term: args.term,
            speed_mbps: args.speed,
            national_tax_pct: config.taxes.national_tax_pct,
            overhead_pct: config.taxes.overhead_pct,
            banda_cost_per_mbps: config.taxes.banda_cost_per_mbps,
            create_last_mile: args.last_mile,
            last_mile_multiplier: args
                .last_mile_multiplier
                .unwrap_or(DEFAULT_LAST_MILE_MULTIPLIER),
            total_commissions: args.commissions.max(Decimal::ZERO),
        }
    };

    let validation = payback::validate_payback(&params);
    let mut value = serde_json::to_value(validation)?;
    if args.schedule {
        value["schedule"] = json!(payback::cash_flow_schedule(&params));
    }
    Ok(value)
}
