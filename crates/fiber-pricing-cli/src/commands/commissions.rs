use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fiber_pricing_core::pricing::commissions;
use fiber_pricing_core::pricing::input::CalculationInput;
use fiber_pricing_core::PricingConfig;

/// Arguments for a commission breakdown
#[derive(Args)]
pub struct CommissionsArgs {
    /// Resolved monthly price (after discounts, markup and last mile)
    #[arg(long)]
    pub monthly_price: Decimal,

    /// Contract term in months
    #[arg(long, default_value = "12")]
    pub term: u32,

    /// Attach a referral (indicator) partner
    #[arg(long)]
    pub referral: bool,

    /// Attach an influencer partner
    #[arg(long)]
    pub influencer: bool,

    /// Monthly fee the existing client pays today
    #[arg(long)]
    pub previous_fee: Option<Decimal>,
}

pub fn run_commissions(
    args: CommissionsArgs,
    config: &PricingConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input = CalculationInput {
        include_referral_partner: args.referral,
        include_influencer_partner: args.influencer,
        is_existing_client: args.previous_fee.is_some(),
        previous_monthly_fee: args.previous_fee.unwrap_or(Decimal::ZERO),
        // speed plays no part in commissions
        ..CalculationInput::new(0, args.term)
    }
    .normalized();

    let result = commissions::compute_commissions(
        args.monthly_price,
        args.term,
        &calc_input,
        &config.commissions,
    );
    Ok(serde_json::to_value(result)?)
}
