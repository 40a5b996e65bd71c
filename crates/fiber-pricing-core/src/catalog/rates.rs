//! Commission rate tables.
//!
//! Seller, channel-seller and channel-director rates are keyed by contract
//! term only. Channel indicator and influencer rates form a 2-D matrix:
//! monthly-revenue bracket (by lower bound) crossed with contract term.
//! Every rate is a percentage on the 0-100 scale.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::PricingError;
use crate::types::{Money, Months, Percent, CONTRACT_TERMS};
use crate::PricingResult;

/// Which of the five commission tables a rate belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionTableKind {
    #[default]
    Seller,
    ChannelSeller,
    ChannelDirector,
    ChannelIndicator,
    ChannelInfluencer,
}

/// Contract term -> percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermRateTable {
    rates: BTreeMap<Months, Percent>,
}

impl TermRateTable {
    pub fn new(rates: impl IntoIterator<Item = (Months, Percent)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    pub fn rate_for(&self, term: Months) -> Option<Percent> {
        self.rates.get(&term).copied()
    }

    /// Overwrite (or add) the rate for one term.
    pub fn set_rate(&mut self, term: Months, rate: Percent) -> PricingResult<()> {
        validate_rate(rate)?;
        self.rates.insert(term, rate);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    fn validate(&self) -> PricingResult<()> {
        self.rates.values().try_for_each(|r| validate_rate(*r))
    }
}

/// One revenue bracket of a channel-partner table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketRow {
    /// Inclusive lower bound of monthly revenue for this bracket
    pub min_monthly_revenue: Money,
    /// Contract term -> percentage
    pub rates: BTreeMap<Months, Percent>,
}

/// Revenue bracket x contract term -> percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<BracketRow>", into = "Vec<BracketRow>")]
pub struct BracketRateTable {
    rows: Vec<BracketRow>,
}

impl BracketRateTable {
    pub fn new(mut rows: Vec<BracketRow>) -> Self {
        rows.sort_by(|a, b| a.min_monthly_revenue.cmp(&b.min_monthly_revenue));
        Self { rows }
    }

    pub fn rows(&self) -> &[BracketRow] {
        &self.rows
    }

    /// Rate for the bracket with the greatest lower bound `<= monthly_revenue`.
    /// Revenue below the first bracket resolves to no rate.
    pub fn rate_for(&self, monthly_revenue: Money, term: Months) -> Option<Percent> {
        self.rows
            .iter()
            .rev()
            .find(|row| row.min_monthly_revenue <= monthly_revenue)
            .and_then(|row| row.rates.get(&term).copied())
    }

    /// Overwrite one cell, inserting the bracket row if it does not exist yet.
    pub fn set_rate(
        &mut self,
        min_monthly_revenue: Money,
        term: Months,
        rate: Percent,
    ) -> PricingResult<()> {
        validate_rate(rate)?;
        if min_monthly_revenue < Decimal::ZERO {
            return Err(PricingError::InvalidInput {
                field: "min_monthly_revenue".into(),
                reason: "Bracket lower bound cannot be negative".into(),
            });
        }
        match self
            .rows
            .binary_search_by(|row| row.min_monthly_revenue.cmp(&min_monthly_revenue))
        {
            Ok(idx) => {
                self.rows[idx].rates.insert(term, rate);
            }
            Err(idx) => self.rows.insert(
                idx,
                BracketRow {
                    min_monthly_revenue,
                    rates: BTreeMap::from([(term, rate)]),
                },
            ),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn validate(&self) -> PricingResult<()> {
        for pair in self.rows.windows(2) {
            if pair[0].min_monthly_revenue == pair[1].min_monthly_revenue {
                return Err(PricingError::InvalidInput {
                    field: "min_monthly_revenue".into(),
                    reason: format!(
                        "Duplicate revenue bracket starting at {}",
                        pair[0].min_monthly_revenue
                    ),
                });
            }
        }
        self.rows
            .iter()
            .flat_map(|row| row.rates.values())
            .try_for_each(|r| validate_rate(*r))
    }
}

impl From<Vec<BracketRow>> for BracketRateTable {
    fn from(rows: Vec<BracketRow>) -> Self {
        BracketRateTable::new(rows)
    }
}

impl From<BracketRateTable> for Vec<BracketRow> {
    fn from(table: BracketRateTable) -> Self {
        table.rows
    }
}

/// The five commission tables, loaded and edited externally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionTables {
    pub seller: TermRateTable,
    pub channel_seller: TermRateTable,
    pub channel_director: TermRateTable,
    pub channel_indicator: BracketRateTable,
    pub channel_influencer: BracketRateTable,
}

/// A single-cell edit of one commission table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEdit {
    pub table: CommissionTableKind,
    pub term: Months,
    /// Bracket lower bound; required for indicator and influencer tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_monthly_revenue: Option<Money>,
    pub rate: Percent,
}

impl CommissionTables {
    pub fn apply(&mut self, edit: &RateEdit) -> PricingResult<()> {
        match (edit.table, edit.min_monthly_revenue) {
            (CommissionTableKind::Seller, _) => self.seller.set_rate(edit.term, edit.rate),
            (CommissionTableKind::ChannelSeller, _) => {
                self.channel_seller.set_rate(edit.term, edit.rate)
            }
            (CommissionTableKind::ChannelDirector, _) => {
                self.channel_director.set_rate(edit.term, edit.rate)
            }
            (CommissionTableKind::ChannelIndicator, Some(min)) => {
                self.channel_indicator.set_rate(min, edit.term, edit.rate)
            }
            (CommissionTableKind::ChannelInfluencer, Some(min)) => {
                self.channel_influencer.set_rate(min, edit.term, edit.rate)
            }
            (kind, None) => Err(PricingError::InvalidInput {
                field: "min_monthly_revenue".into(),
                reason: format!("{kind:?} rates are keyed by revenue bracket"),
            }),
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        self.seller.validate()?;
        self.channel_seller.validate()?;
        self.channel_director.validate()?;
        self.channel_indicator.validate()?;
        self.channel_influencer.validate()
    }
}

impl Default for CommissionTables {
    fn default() -> Self {
        Self {
            seller: term_table([dec!(1.2), dec!(2.4), dec!(3.6), dec!(4.8), dec!(6.0)]),
            channel_seller: term_table([dec!(0.6), dec!(1.2), dec!(2.0), dec!(2.0), dec!(2.0)]),
            channel_director: term_table([dec!(0.3), dec!(0.6), dec!(0.9), dec!(1.2), dec!(1.5)]),
            channel_indicator: bracket_table(&[
                (dec!(0), [dec!(1.5), dec!(2.0), dec!(2.5), dec!(2.5), dec!(2.5)]),
                (dec!(500), [dec!(2.0), dec!(2.5), dec!(3.0), dec!(3.0), dec!(3.0)]),
                (dec!(1000), [dec!(2.5), dec!(3.0), dec!(3.5), dec!(3.5), dec!(3.5)]),
                (dec!(1500), [dec!(3.0), dec!(3.5), dec!(4.0), dec!(4.0), dec!(4.0)]),
                (dec!(3000), [dec!(3.5), dec!(4.0), dec!(4.5), dec!(4.5), dec!(4.5)]),
                (dec!(5000), [dec!(4.0), dec!(4.5), dec!(5.0), dec!(5.0), dec!(5.0)]),
                (dec!(6500), [dec!(4.5), dec!(5.0), dec!(5.5), dec!(5.5), dec!(5.5)]),
                (dec!(9000), [dec!(5.0), dec!(5.5), dec!(6.0), dec!(6.0), dec!(6.0)]),
            ]),
            channel_influencer: bracket_table(&[
                (dec!(0), [dec!(1.0), dec!(1.5), dec!(2.0), dec!(2.0), dec!(2.0)]),
                (dec!(500), [dec!(1.5), dec!(2.0), dec!(2.5), dec!(2.5), dec!(2.5)]),
                (dec!(1000), [dec!(2.0), dec!(2.5), dec!(3.0), dec!(3.0), dec!(3.0)]),
                (dec!(1500), [dec!(2.5), dec!(3.0), dec!(3.5), dec!(3.5), dec!(3.5)]),
                (dec!(3000), [dec!(3.0), dec!(3.5), dec!(4.0), dec!(4.0), dec!(4.0)]),
                (dec!(5000), [dec!(3.5), dec!(4.0), dec!(4.5), dec!(4.5), dec!(4.5)]),
                (dec!(6500), [dec!(4.0), dec!(4.5), dec!(5.0), dec!(5.0), dec!(5.0)]),
                (dec!(9000), [dec!(4.5), dec!(5.0), dec!(5.5), dec!(5.5), dec!(5.5)]),
            ]),
        }
    }
}

fn term_table(rates: [Percent; 5]) -> TermRateTable {
    TermRateTable::new(CONTRACT_TERMS.into_iter().zip(rates))
}

fn bracket_table(rows: &[(Money, [Percent; 5])]) -> BracketRateTable {
    BracketRateTable::new(
        rows.iter()
            .map(|(min, rates)| BracketRow {
                min_monthly_revenue: *min,
                rates: CONTRACT_TERMS.into_iter().zip(*rates).collect(),
            })
            .collect(),
    )
}

fn validate_rate(rate: Percent) -> PricingResult<()> {
    if rate < Decimal::ZERO || rate > dec!(100) {
        return Err(PricingError::InvalidInput {
            field: "rate".into(),
            reason: format!("Commission rate must be between 0 and 100, got {rate}"),
        });
    }
    Ok(())
}
