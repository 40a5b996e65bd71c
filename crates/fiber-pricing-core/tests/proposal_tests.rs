use fiber_pricing_core::catalog::plans::PlanCatalog;
use fiber_pricing_core::catalog::rates::CommissionTables;
use fiber_pricing_core::pricing::commissions::compute_commissions;
use fiber_pricing_core::pricing::discounts::resolve_monthly_price;
use fiber_pricing_core::pricing::dre::{build_dre, build_dre_for_period};
use fiber_pricing_core::pricing::input::{CalculationInput, TaxRates};
use fiber_pricing_core::pricing::payback::{simulate_payback, validate_payback, PaybackParams};
use fiber_pricing_core::pricing::proposal::calculate_proposal;
use fiber_pricing_core::PricingConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// End-to-end proposal scenarios
// ===========================================================================

#[test]
fn test_600_mbps_12_month_bandwidth_cost() {
    let config = PricingConfig::default();
    let input = CalculationInput::new(600, 12);
    let out = calculate_proposal(&config, &input).unwrap().result;

    let row = out.dre.iter().find(|p| p.months == 12).unwrap();
    // 600 Mbps * 2.09 * 12 months
    assert_eq!(row.bandwidth_cost, dec!(15048.00));
    assert_eq!(row.fiber_cost, dec!(7000));
    assert_eq!(row.total_revenue, dec!(20248) * dec!(12));
}

#[test]
fn test_600_mbps_12_month_full_statement() {
    let config = PricingConfig::default();
    let input = CalculationInput::new(600, 12);
    let out = calculate_proposal(&config, &input).unwrap().result;
    let row = &out.dre[0];

    // revenue 242976; tax 15% = 36446.4; overhead 10% = 24297.6
    // seller 1.2% = 2915.712; director 0.3% = 728.928
    assert_eq!(row.combined_revenue, dec!(242976));
    assert_eq!(row.national_tax, dec!(36446.4));
    assert_eq!(row.overhead_cost, dec!(24297.6));
    assert_eq!(row.seller_commission, dec!(2915.712));
    assert_eq!(row.director_commission, dec!(728.928));
    assert_eq!(row.total_commissions, dec!(3644.64));
    // 242976 - 7000 - 15048 - 36446.4 - 3644.64 - 24297.6
    assert_eq!(row.balance, dec!(156539.36));
    assert_eq!(row.profitability_pct, dec!(156539.36) / dec!(7000) * dec!(100));
    // opening balance -7000, month 1 net is already above 7000
    assert_eq!(row.payback_months, 1);
}

#[test]
fn test_discounted_partner_proposal() {
    let config = PricingConfig::default();
    let input = CalculationInput {
        apply_salesperson_discount: true,
        director_discount_percentage: dec!(15),
        include_referral_partner: true,
        ..CalculationInput::new(100, 12)
    };
    let out = calculate_proposal(&config, &input).unwrap().result;

    // 4013 * 0.95 * 0.85 * 1.20
    let expected = dec!(4013) * dec!(0.95) * dec!(0.85) * dec!(1.20);
    assert_eq!(out.result.monthly_price, expected);
    assert_eq!(
        out.result.commissions.seller_table,
        fiber_pricing_core::catalog::rates::CommissionTableKind::ChannelSeller
    );
    assert!(out.result.commissions.indicator > Decimal::ZERO);
    assert_eq!(out.result.commissions.influencer, Decimal::ZERO);
}

#[test]
fn test_dre_monthly_value_uses_selected_term_price() {
    let plan = PlanCatalog::default().get(200).unwrap().clone();
    let input = CalculationInput::new(200, 36);
    let periods = build_dre(&plan, &input, &CommissionTables::default());
    for p in &periods {
        assert_eq!(p.monthly_value, dec!(5808));
        assert_eq!(p.total_revenue, dec!(5808) * Decimal::from(p.months));
    }
}

#[test]
fn test_dre_period_commission_matches_calculator_at_bucket_term() {
    let plan = PlanCatalog::default().get(300).unwrap().clone();
    let tables = CommissionTables::default();
    let input = CalculationInput {
        include_influencer_partner: true,
        ..CalculationInput::new(300, 24)
    };
    let period = build_dre_for_period(48, &plan, &input, &tables);
    let monthly = resolve_monthly_price(plan.price_for(24), &input);
    let direct = compute_commissions(monthly, 48, &input, &tables);
    assert_eq!(period.total_commissions, direct.total);
    assert_eq!(period.influencer_commission, direct.influencer);
}

#[test]
fn test_existing_client_upsell_commissions() {
    let config = PricingConfig::default();
    let input = CalculationInput {
        is_existing_client: true,
        previous_monthly_fee: dec!(3000),
        ..CalculationInput::new(100, 24)
    };
    let out = calculate_proposal(&config, &input).unwrap().result;
    // (3612 - 3000) * 24
    assert_eq!(out.result.commissions.base, dec!(14688));
    assert_eq!(out.result.commissions.seller, dec!(14688) * dec!(0.024));
}

#[test]
fn test_last_mile_proposal() {
    let config = PricingConfig::default();
    let input = CalculationInput {
        create_last_mile: true,
        last_mile_multiplier: dec!(2),
        ..CalculationInput::new(50, 12)
    };
    let out = calculate_proposal(&config, &input).unwrap().result;
    assert_eq!(out.result.monthly_price, dec!(4778));
    for p in &out.dre {
        assert_eq!(p.bandwidth_cost, Decimal::ZERO);
        assert_eq!(p.last_mile_cost, dec!(2389) * Decimal::from(p.months));
    }
}

// ===========================================================================
// Payback validation
// ===========================================================================

#[test]
fn test_installation_covers_investment() {
    let params = PaybackParams {
        installation_fee: dec!(12000),
        upfront_investment: dec!(7000),
        monthly_revenue: dec!(-10),
        contract_term: 36,
        speed_mbps: 600,
        national_tax_pct: dec!(15),
        overhead_pct: dec!(10),
        banda_cost_per_mbps: dec!(2.09),
        create_last_mile: false,
        last_mile_multiplier: dec!(1.75),
        total_commissions: dec!(1000),
    };
    assert_eq!(simulate_payback(&params), 0);
    let v = validate_payback(&params);
    assert!(v.is_valid);
    assert_eq!(v.max_payback, 11);
}

#[test]
fn test_slow_payback_flagged_invalid() {
    let config = PricingConfig::default();
    // bandwidth eats most of the revenue; the fiber cost is never recovered
    let input = CalculationInput {
        taxes: Some(TaxRates {
            banda_cost_per_mbps: dec!(40),
            ..TaxRates::default()
        }),
        ..CalculationInput::new(25, 12)
    };
    let out = calculate_proposal(&config, &input).unwrap();
    let payback = &out.result.result.payback;
    assert!(payback.actual_payback > payback.max_payback);
    assert!(!payback.is_valid);
    assert!(out.warnings.iter().any(|w| w.contains("exceeds")));
}

// ===========================================================================
// Configured tax defaults
// ===========================================================================

#[test]
fn test_zero_tax_config_flows_into_every_stage() {
    let config = PricingConfig::from_json(
        r#"{"taxes": {"national_tax_pct": "0", "banda_cost_per_mbps": "0", "overhead_pct": "0"}}"#,
    )
    .unwrap();
    let input: CalculationInput =
        serde_json::from_str(r#"{"speed": 600, "contract_term": 12}"#).unwrap();

    let out = calculate_proposal(&config, &input).unwrap().result;
    for p in &out.dre {
        assert_eq!(p.national_tax, Decimal::ZERO);
        assert_eq!(p.bandwidth_cost, Decimal::ZERO);
        assert_eq!(p.overhead_cost, Decimal::ZERO);
    }

    let resolved = config.resolve_input(&input);
    let plan = config.plans.get(600).unwrap();
    let periods = build_dre(plan, &resolved, &config.commissions);
    assert_eq!(periods, out.dre);
}
