use serde::{Deserialize, Serialize};

use crate::catalog::plans::PlanCatalog;
use crate::catalog::rates::CommissionTables;
use crate::pricing::input::{CalculationInput, TaxRates};
use crate::PricingResult;

/// Caller-owned configuration snapshot: plan catalog, commission tables and
/// default tax assumptions. Treated as read-only for the duration of a
/// calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub plans: PlanCatalog,
    pub commissions: CommissionTables,
    pub taxes: TaxRates,
}

impl PricingConfig {
    /// Parse a JSON configuration, filling any missing section with the seeded defaults.
    pub fn from_json(json: &str) -> PricingResult<Self> {
        let config: PricingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The input as the engine sees it: a missing tax override takes this
    /// configuration's rates, then every field is clamped into range.
    pub fn resolve_input(&self, input: &CalculationInput) -> CalculationInput {
        input.with_default_taxes(&self.taxes).normalized()
    }

    pub fn validate(&self) -> PricingResult<()> {
        self.commissions.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_json_is_default() {
        let config = PricingConfig::from_json("{}").unwrap();
        assert_eq!(config, PricingConfig::default());
    }

    #[test]
    fn test_rejects_negative_rate() {
        let json = r#"{"commissions": {"seller": {"12": "-1"}}}"#;
        assert!(PricingConfig::from_json(json).is_err());
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = PricingConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back = PricingConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.taxes.banda_cost_per_mbps, dec!(2.09));
    }

    #[test]
    fn test_resolve_input_prefers_input_taxes() {
        let config = PricingConfig::from_json(
            r#"{"taxes": {"national_tax_pct": "0", "banda_cost_per_mbps": "0", "overhead_pct": "0"}}"#,
        )
        .unwrap();

        let plain = config.resolve_input(&CalculationInput::new(600, 12));
        assert_eq!(plain.taxes, Some(config.taxes));

        let own = CalculationInput {
            taxes: Some(TaxRates::default()),
            ..CalculationInput::new(600, 12)
        };
        assert_eq!(config.resolve_input(&own).tax_rates(), TaxRates::default());
    }
}
