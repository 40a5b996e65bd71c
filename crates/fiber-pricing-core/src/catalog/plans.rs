use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::PricingError;
use crate::types::{Mbps, Money, Months, CONTRACT_TERMS, MAX_MONEY};
use crate::PricingResult;

/// One fiber-speed offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTier {
    /// Speed in Mbps; unique within a catalog
    pub speed: Mbps,
    /// Monthly price per contract term (months -> price)
    pub price_by_term: BTreeMap<Months, Money>,
    /// One-off installation charge
    pub installation_cost: Money,
    /// Provider's underlying equipment/build cost. Never shown to the customer.
    pub fiber_cost: Money,
}

impl PlanTier {
    /// Monthly price for `term`, or zero when the tier has no price for it.
    pub fn price_for(&self, term: Months) -> Money {
        self.price_by_term
            .get(&term)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// The fiber plan catalog, kept sorted by speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PlanTier>", into = "Vec<PlanTier>")]
pub struct PlanCatalog {
    tiers: Vec<PlanTier>,
}

impl PlanCatalog {
    pub fn new(mut tiers: Vec<PlanTier>) -> PricingResult<Self> {
        tiers.sort_by_key(|t| t.speed);
        for pair in tiers.windows(2) {
            if pair[0].speed == pair[1].speed {
                return Err(PricingError::InvalidInput {
                    field: "speed".into(),
                    reason: format!("Duplicate {} Mbps tier in catalog", pair[0].speed),
                });
            }
        }
        for tier in &tiers {
            validate_tier(tier)?;
        }
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[PlanTier] {
        &self.tiers
    }

    pub fn find(&self, speed: Mbps) -> Option<&PlanTier> {
        self.tiers
            .binary_search_by_key(&speed, |t| t.speed)
            .ok()
            .map(|idx| &self.tiers[idx])
    }

    pub fn get(&self, speed: Mbps) -> PricingResult<&PlanTier> {
        self.find(speed).ok_or(PricingError::UnknownPlan { speed })
    }

    /// Overwrite the monthly price of one tier for one contract term.
    pub fn update_price(&mut self, speed: Mbps, term: Months, price: Money) -> PricingResult<()> {
        if !CONTRACT_TERMS.contains(&term) {
            return Err(PricingError::UnsupportedTerm { term });
        }
        check_amount("price", price)?;
        let tier = self.get_mut(speed)?;
        tier.price_by_term.insert(term, price);
        Ok(())
    }

    /// Overwrite the installation and fiber costs of one tier.
    pub fn update_costs(
        &mut self,
        speed: Mbps,
        installation_cost: Money,
        fiber_cost: Money,
    ) -> PricingResult<()> {
        check_amount("installation_cost", installation_cost)?;
        check_amount("fiber_cost", fiber_cost)?;
        let tier = self.get_mut(speed)?;
        tier.installation_cost = installation_cost;
        tier.fiber_cost = fiber_cost;
        Ok(())
    }

    /// Insert a new tier or replace the existing tier with the same speed.
    pub fn upsert(&mut self, tier: PlanTier) -> PricingResult<()> {
        validate_tier(&tier)?;
        match self.tiers.binary_search_by_key(&tier.speed, |t| t.speed) {
            Ok(idx) => self.tiers[idx] = tier,
            Err(idx) => self.tiers.insert(idx, tier),
        }
        Ok(())
    }

    fn get_mut(&mut self, speed: Mbps) -> PricingResult<&mut PlanTier> {
        match self.tiers.binary_search_by_key(&speed, |t| t.speed) {
            Ok(idx) => Ok(&mut self.tiers[idx]),
            Err(_) => Err(PricingError::UnknownPlan { speed }),
        }
    }
}

impl Default for PlanCatalog {
    /// The fixed fiber catalog seeded at session start.
    fn default() -> Self {
        let rows: [(Mbps, [Money; 5], Money, Money); 17] = [
            (25, [dec!(1580), dec!(1423), dec!(1265), dec!(1186), dec!(1107)], dec!(998), dec!(3500)),
            (30, [dec!(1740), dec!(1566), dec!(1392), dec!(1305), dec!(1218)], dec!(998), dec!(3500)),
            (40, [dec!(2065), dec!(1858), dec!(1652), dec!(1549), dec!(1446)], dec!(998), dec!(3500)),
            (50, [dec!(2389), dec!(2150), dec!(1911), dec!(1792), dec!(1672)], dec!(998), dec!(3500)),
            (60, [dec!(2714), dec!(2443), dec!(2171), dec!(2036), dec!(1900)], dec!(998), dec!(3500)),
            (80, [dec!(3363), dec!(3027), dec!(2690), dec!(2522), dec!(2354)], dec!(998), dec!(3500)),
            (100, [dec!(4013), dec!(3612), dec!(3210), dec!(3010), dec!(2809)], dec!(998), dec!(3500)),
            (150, [dec!(5636), dec!(5073), dec!(4509), dec!(4227), dec!(3945)], dec!(998), dec!(3500)),
            (200, [dec!(7260), dec!(6534), dec!(5808), dec!(5445), dec!(5082)], dec!(1996), dec!(5000)),
            (300, [dec!(10507), dec!(9456), dec!(8406), dec!(7880), dec!(7355)], dec!(1996), dec!(5000)),
            (400, [dec!(13754), dec!(12379), dec!(11003), dec!(10316), dec!(9628)], dec!(1996), dec!(5000)),
            (500, [dec!(17001), dec!(15301), dec!(13601), dec!(12751), dec!(11901)], dec!(2500), dec!(7000)),
            (600, [dec!(20248), dec!(18223), dec!(16198), dec!(15186), dec!(14174)], dec!(2500), dec!(7000)),
            (700, [dec!(23495), dec!(21146), dec!(18796), dec!(17621), dec!(16447)], dec!(2500), dec!(7000)),
            (800, [dec!(26742), dec!(24068), dec!(21394), dec!(20057), dec!(18719)], dec!(2500), dec!(7000)),
            (900, [dec!(29989), dec!(26990), dec!(23991), dec!(22492), dec!(20992)], dec!(2500), dec!(7000)),
            (1000, [dec!(33236), dec!(29912), dec!(26589), dec!(24927), dec!(23265)], dec!(2500), dec!(7000)),
        ];

        let tiers = rows
            .into_iter()
            .map(|(speed, prices, installation_cost, fiber_cost)| PlanTier {
                speed,
                price_by_term: CONTRACT_TERMS.into_iter().zip(prices).collect(),
                installation_cost,
                fiber_cost,
            })
            .collect();

        Self { tiers }
    }
}

impl TryFrom<Vec<PlanTier>> for PlanCatalog {
    type Error = PricingError;

    fn try_from(tiers: Vec<PlanTier>) -> PricingResult<Self> {
        PlanCatalog::new(tiers)
    }
}

impl From<PlanCatalog> for Vec<PlanTier> {
    fn from(catalog: PlanCatalog) -> Self {
        catalog.tiers
    }
}

fn validate_tier(tier: &PlanTier) -> PricingResult<()> {
    if tier.speed == 0 {
        return Err(PricingError::InvalidInput {
            field: "speed".into(),
            reason: "Plan speed must be positive".into(),
        });
    }
    check_amount(&format!("plan {} installation_cost", tier.speed), tier.installation_cost)?;
    check_amount(&format!("plan {} fiber_cost", tier.speed), tier.fiber_cost)?;
    for (term, price) in &tier.price_by_term {
        check_amount(&format!("plan {} price_by_term[{term}]", tier.speed), *price)?;
    }
    Ok(())
}

/// Money must lie in [0, `MAX_MONEY`].
fn check_amount(field: &str, amount: Money) -> PricingResult<()> {
    if amount < Decimal::ZERO || amount > MAX_MONEY {
        return Err(PricingError::InvalidInput {
            field: field.into(),
            reason: format!("Amount must be between 0 and {MAX_MONEY}, got {amount}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_600_mbps() {
        let catalog = PlanCatalog::default();
        let plan = catalog.get(600).unwrap();
        assert_eq!(plan.installation_cost, dec!(2500));
        assert_eq!(plan.fiber_cost, dec!(7000));
        assert_eq!(plan.price_for(12), dec!(20248));
    }

    #[test]
    fn test_default_catalog_is_sorted_and_unique() {
        let catalog = PlanCatalog::default();
        let speeds: Vec<_> = catalog.tiers().iter().map(|t| t.speed).collect();
        let mut sorted = speeds.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(speeds, sorted);
    }

    #[test]
    fn test_unknown_speed() {
        let catalog = PlanCatalog::default();
        assert!(catalog.find(75).is_none());
        assert!(matches!(
            catalog.get(75),
            Err(PricingError::UnknownPlan { speed: 75 })
        ));
    }

    #[test]
    fn test_price_for_missing_term_is_zero() {
        let catalog = PlanCatalog::default();
        assert_eq!(catalog.get(100).unwrap().price_for(18), Decimal::ZERO);
    }

    #[test]
    fn test_update_price_overwrites() {
        let mut catalog = PlanCatalog::default();
        catalog.update_price(100, 36, dec!(3000)).unwrap();
        assert_eq!(catalog.get(100).unwrap().price_for(36), dec!(3000));
    }

    #[test]
    fn test_update_price_rejects_bad_term_and_negative() {
        let mut catalog = PlanCatalog::default();
        assert!(matches!(
            catalog.update_price(100, 18, dec!(3000)),
            Err(PricingError::UnsupportedTerm { term: 18 })
        ));
        assert!(catalog.update_price(100, 12, dec!(-1)).is_err());
        assert!(catalog.update_price(100, 12, MAX_MONEY + Decimal::ONE).is_err());
        assert!(catalog.update_costs(100, Decimal::MAX, dec!(3500)).is_err());
        assert_eq!(catalog.get(100).unwrap().price_for(12), dec!(4013));
    }

    #[test]
    fn test_catalog_json_rejects_oversized_price() {
        let json = r#"[{"speed": 100, "price_by_term": {"60": "7900000000000000000000000000"},
            "installation_cost": "998", "fiber_cost": "3500"}]"#;
        assert!(serde_json::from_str::<PlanCatalog>(json).is_err());
    }

    #[test]
    fn test_update_costs() {
        let mut catalog = PlanCatalog::default();
        catalog.update_costs(200, dec!(1500), dec!(4800)).unwrap();
        let plan = catalog.get(200).unwrap();
        assert_eq!(plan.installation_cost, dec!(1500));
        assert_eq!(plan.fiber_cost, dec!(4800));
    }

    #[test]
    fn test_upsert_inserts_in_order_and_replaces() {
        let mut catalog = PlanCatalog::default();
        let tier = PlanTier {
            speed: 75,
            price_by_term: [(12, dec!(3000))].into_iter().collect(),
            installation_cost: dec!(998),
            fiber_cost: dec!(3500),
        };
        catalog.upsert(tier.clone()).unwrap();
        assert_eq!(catalog.get(75).unwrap(), &tier);

        let replaced = PlanTier {
            fiber_cost: dec!(3600),
            ..tier
        };
        catalog.upsert(replaced).unwrap();
        assert_eq!(catalog.get(75).unwrap().fiber_cost, dec!(3600));
        assert_eq!(catalog.tiers().len(), PlanCatalog::default().tiers().len() + 1);
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let tier = PlanCatalog::default().get(100).unwrap().clone();
        assert!(PlanCatalog::new(vec![tier.clone(), tier]).is_err());
    }
}
