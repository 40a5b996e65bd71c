use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::pricing::discounts::effective_last_mile_multiplier;
use crate::types::{clamp_money, clamp_percent, Mbps, Money, Months, Percent};

/// Default last-mile price multiplier.
pub const DEFAULT_LAST_MILE_MULTIPLIER: Decimal = dec!(1.75);

/// Fixed salesperson discount, in percent.
pub const SALESPERSON_DISCOUNT_PCT: Percent = dec!(5);

/// Tax and cost assumptions applied to every calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRates {
    /// National simplified tax, percent of revenue
    pub national_tax_pct: Percent,
    /// Bandwidth cost per Mbps per month
    pub banda_cost_per_mbps: Money,
    /// General overhead, percent of revenue
    pub overhead_pct: Percent,
}

impl TaxRates {
    /// Percentages clamped into [0, 100], bandwidth cost into [0, `MAX_MONEY`].
    pub fn normalized(&self) -> Self {
        Self {
            national_tax_pct: clamp_percent(self.national_tax_pct),
            banda_cost_per_mbps: clamp_money(self.banda_cost_per_mbps),
            overhead_pct: clamp_percent(self.overhead_pct),
        }
    }
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            national_tax_pct: dec!(15),
            banda_cost_per_mbps: dec!(2.09),
            overhead_pct: dec!(10),
        }
    }
}

/// Per-invocation parameters from the proposal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Selected plan speed (Mbps)
    pub speed: Mbps,
    /// Selected contract term in months
    pub contract_term: Months,
    #[serde(default)]
    pub include_installation: bool,
    /// Fixed 5% salesperson discount
    #[serde(default)]
    pub apply_salesperson_discount: bool,
    /// Director discount, 0-100
    #[serde(default)]
    pub director_discount_percentage: Percent,
    #[serde(default)]
    pub include_referral_partner: bool,
    #[serde(default)]
    pub include_influencer_partner: bool,
    #[serde(default)]
    pub is_existing_client: bool,
    /// Monthly fee the existing client pays today
    #[serde(default)]
    pub previous_monthly_fee: Money,
    #[serde(default)]
    pub create_last_mile: bool,
    #[serde(default = "default_last_mile_multiplier")]
    pub last_mile_multiplier: Decimal,
    /// Per-proposal tax override; `None` uses the configuration's rates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<TaxRates>,
}

fn default_last_mile_multiplier() -> Decimal {
    DEFAULT_LAST_MILE_MULTIPLIER
}

impl CalculationInput {
    /// A plain quote: no discounts, partners, upsell or last mile.
    pub fn new(speed: Mbps, contract_term: Months) -> Self {
        Self {
            speed,
            contract_term,
            include_installation: false,
            apply_salesperson_discount: false,
            director_discount_percentage: Decimal::ZERO,
            include_referral_partner: false,
            include_influencer_partner: false,
            is_existing_client: false,
            previous_monthly_fee: Decimal::ZERO,
            create_last_mile: false,
            last_mile_multiplier: DEFAULT_LAST_MILE_MULTIPLIER,
            taxes: None,
        }
    }

    /// Tax rates in effect: the override when present, the built-in defaults otherwise.
    pub fn tax_rates(&self) -> TaxRates {
        self.taxes.unwrap_or_default()
    }

    /// Fill a missing tax override with `defaults`, typically the configuration's rates.
    pub fn with_default_taxes(&self, defaults: &TaxRates) -> Self {
        Self {
            taxes: Some(self.taxes.unwrap_or(*defaults)),
            ..self.clone()
        }
    }

    pub fn has_partner(&self) -> bool {
        self.include_referral_partner || self.include_influencer_partner
    }

    /// Whether commissions are paid only on the upsell over the current fee.
    pub fn is_upsell(&self) -> bool {
        self.is_existing_client && self.previous_monthly_fee > Decimal::ZERO
    }

    /// Clamp every numeric field into its documented range.
    ///
    /// Percentages land in [0, 100], money in [0, `MAX_MONEY`] and the
    /// last-mile multiplier falls back to 1.75 when not positive (capped at 100).
    pub fn normalized(&self) -> Self {
        Self {
            director_discount_percentage: clamp_percent(self.director_discount_percentage),
            previous_monthly_fee: clamp_money(self.previous_monthly_fee),
            last_mile_multiplier: effective_last_mile_multiplier(self.last_mile_multiplier),
            taxes: self.taxes.map(|t| t.normalized()),
            ..self.clone()
        }
    }
}
