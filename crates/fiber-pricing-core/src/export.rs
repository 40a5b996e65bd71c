use crate::error::PricingError;
use crate::pricing::dre::DrePeriod;
use crate::PricingResult;

/// Header row of the DRE spreadsheet export.
pub const DRE_CSV_HEADER: [&str; 4] = ["Período", "Receita Mensal", "Balance", "Rentabilidade"];

/// Serialize the DRE buckets as CSV: one row per period with the monthly
/// value, balance and profitability (suffixed with `%`), two decimals each.
pub fn export_dre_csv(periods: &[DrePeriod]) -> PricingResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(DRE_CSV_HEADER)?;

    for p in periods {
        wtr.write_record([
            format!("{} meses", p.months),
            format!("{:.2}", p.monthly_value.round_dp(2)),
            format!("{:.2}", p.balance.round_dp(2)),
            format!("{:.2}%", p.profitability_pct.round_dp(2)),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| PricingError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| PricingError::Export(e.to_string()))
}
