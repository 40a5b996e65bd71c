use serde_json::Value;

use fiber_pricing_core::export;
use fiber_pricing_core::pricing::dre;
use fiber_pricing_core::PricingConfig;

use crate::commands::quote::{resolve_input, ProposalArgs};
use crate::OutputFormat;

/// Build the five DRE buckets. CSV output uses the spreadsheet export layout.
pub fn run_dre(
    args: ProposalArgs,
    config: &PricingConfig,
    format: &OutputFormat,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input = config.resolve_input(&resolve_input(&args, config)?);
    let plan = config.plans.get(calc_input.speed)?;
    let periods = dre::build_dre(plan, &calc_input, &config.commissions);

    match format {
        OutputFormat::Csv => Ok(Value::String(export::export_dre_csv(&periods)?)),
        _ => Ok(serde_json::to_value(periods)?),
    }
}
