use serde_json::{Map, Value};

use fiber_pricing_core::PricingConfig;

/// List the plan catalog, one flat row per speed tier.
pub fn run_plans(config: &PricingConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let rows = config
        .plans
        .tiers()
        .iter()
        .map(|tier| -> Result<Value, serde_json::Error> {
            let mut row = Map::new();
            row.insert("speed_mbps".into(), Value::from(tier.speed));
            for (term, price) in &tier.price_by_term {
                row.insert(format!("price_{term}m"), serde_json::to_value(price)?);
            }
            row.insert(
                "installation_cost".into(),
                serde_json::to_value(tier.installation_cost)?,
            );
            row.insert("fiber_cost".into(), serde_json::to_value(tier.fiber_cost)?);
            Ok(Value::Object(row))
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()?;
    Ok(Value::Array(rows))
}
