use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use fiber_pricing_core::catalog::rates::RateEdit;
use fiber_pricing_core::pricing::input::CalculationInput;
use fiber_pricing_core::PricingConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// An empty or missing config string means the seeded defaults.
fn parse_config(config_json: Option<String>) -> NapiResult<PricingConfig> {
    match config_json.as_deref().map(str::trim) {
        None | Some("") => Ok(PricingConfig::default()),
        Some(json) => PricingConfig::from_json(json).map_err(to_napi_error),
    }
}

/// Parse a proposal input and resolve it against the config: missing taxes
/// take the configured rates, every field is clamped into range.
fn parse_input(config: &PricingConfig, input_json: &str) -> NapiResult<CalculationInput> {
    let input: CalculationInput = serde_json::from_str(input_json).map_err(to_napi_error)?;
    Ok(config.resolve_input(&input))
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[napi]
pub fn default_config() -> NapiResult<String> {
    serde_json::to_string(&PricingConfig::default()).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct PriceEdit {
    speed: u32,
    term: u32,
    price: Decimal,
}

#[napi]
pub fn update_plan_price(config_json: Option<String>, edit_json: String) -> NapiResult<String> {
    let mut config = parse_config(config_json)?;
    let edit: PriceEdit = serde_json::from_str(&edit_json).map_err(to_napi_error)?;
    config
        .plans
        .update_price(edit.speed, edit.term, edit.price)
        .map_err(to_napi_error)?;
    serde_json::to_string(&config).map_err(to_napi_error)
}

#[napi]
pub fn update_commission_rate(config_json: Option<String>, edit_json: String) -> NapiResult<String> {
    let mut config = parse_config(config_json)?;
    let edit: RateEdit = serde_json::from_str(&edit_json).map_err(to_napi_error)?;
    config.commissions.apply(&edit).map_err(to_napi_error)?;
    serde_json::to_string(&config).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

#[napi]
pub fn resolve_monthly_price(base_price: String, input_json: String) -> NapiResult<String> {
    let base: Decimal = base_price.trim().parse().map_err(to_napi_error)?;
    let input: CalculationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let input = input.normalized();
    let price = fiber_pricing_core::pricing::discounts::resolve_monthly_price(base, &input);
    Ok(price.to_string())
}

#[napi]
pub fn compute_commissions(
    config_json: Option<String>,
    monthly_price: String,
    input_json: String,
) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let price: Decimal = monthly_price.trim().parse().map_err(to_napi_error)?;
    let input = parse_input(&config, &input_json)?;
    let output = fiber_pricing_core::pricing::commissions::compute_commissions(
        price,
        input.contract_term,
        &input,
        &config.commissions,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_payback(params_json: String) -> NapiResult<u32> {
    let params: fiber_pricing_core::pricing::payback::PaybackParams =
        serde_json::from_str(&params_json).map_err(to_napi_error)?;
    Ok(fiber_pricing_core::pricing::payback::simulate_payback(&params))
}

#[napi]
pub fn validate_payback(params_json: String) -> NapiResult<String> {
    let params: fiber_pricing_core::pricing::payback::PaybackParams =
        serde_json::from_str(&params_json).map_err(to_napi_error)?;
    let output = fiber_pricing_core::pricing::payback::validate_payback(&params);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_dre(config_json: Option<String>, input_json: String) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let input = parse_input(&config, &input_json)?;
    let plan = config.plans.get(input.speed).map_err(to_napi_error)?;
    let output = fiber_pricing_core::pricing::dre::build_dre(plan, &input, &config.commissions);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Proposal and export
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_proposal(config_json: Option<String>, input_json: String) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let input = parse_input(&config, &input_json)?;
    let output = fiber_pricing_core::pricing::proposal::calculate_proposal(&config, &input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn export_dre_csv(config_json: Option<String>, input_json: String) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let input = parse_input(&config, &input_json)?;
    let plan = config.plans.get(input.speed).map_err(to_napi_error)?;
    let periods = fiber_pricing_core::pricing::dre::build_dre(plan, &input, &config.commissions);
    fiber_pricing_core::export::export_dre_csv(&periods).map_err(to_napi_error)
}
