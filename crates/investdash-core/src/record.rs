use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::error::InvestDashError;
use crate::types::*;
use crate::InvestDashResult;

/// One period's cash flow. `period` is used as the discounting exponent for NPV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub period: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Money,
}

/// The single edited and persisted entity of the dashboard.
///
/// Every edit produces a new record; the engine only ever reads one.
/// Amounts are written as JSON numbers and read from numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    /// Outflow at period 0
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_investment: Money,
    /// Discount rate as a percentage (15 = 15%)
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_rate: Percent,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub cash_flows: Vec<CashFlowEntry>,
}

/// A point on the cumulative cash-flow chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub cash: Money,
    pub cumulative: Money,
}

impl Default for InvestmentRecord {
    fn default() -> Self {
        Self {
            initial_investment: dec!(5000000),
            discount_rate: dec!(15),
            currency: Currency::AOA,
            cash_flows: vec![
                CashFlowEntry { period: 1, amount: dec!(1000000) },
                CashFlowEntry { period: 2, amount: dec!(1500000) },
                CashFlowEntry { period: 3, amount: dec!(2000000) },
                CashFlowEntry { period: 4, amount: dec!(2500000) },
                CashFlowEntry { period: 5, amount: dec!(3000000) },
            ],
        }
    }
}

impl InvestmentRecord {
    /// Build a record whose flows sit at periods 1..=n in the given order.
    pub fn from_amounts(
        initial_investment: Money,
        discount_rate: Percent,
        currency: Currency,
        amounts: &[Money],
    ) -> Self {
        let cash_flows = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| CashFlowEntry {
                period: (i + 1) as u32,
                amount: *amount,
            })
            .collect();
        Self {
            initial_investment,
            discount_rate,
            currency,
            cash_flows,
        }
    }

    pub fn with_initial_investment(self, initial_investment: Money) -> Self {
        Self {
            initial_investment,
            ..self
        }
    }

    pub fn with_discount_rate(self, discount_rate: Percent) -> Self {
        Self {
            discount_rate,
            ..self
        }
    }

    pub fn with_currency(self, currency: Currency) -> Self {
        Self { currency, ..self }
    }

    /// Replace the amount of the entry at `index` (zero-based list position).
    pub fn with_flow_amount(self, index: usize, amount: Money) -> InvestDashResult<Self> {
        if index >= self.cash_flows.len() {
            return Err(InvestDashError::InvalidInput {
                field: "index".into(),
                reason: format!(
                    "no cash flow at position {index}; the record has {} entries",
                    self.cash_flows.len()
                ),
            });
        }
        let mut cash_flows = self.cash_flows;
        cash_flows[index].amount = amount;
        Ok(Self { cash_flows, ..self })
    }

    /// Append a zero-amount entry numbered one past the current length.
    pub fn with_added_period(self) -> Self {
        let mut cash_flows = self.cash_flows;
        let period = (cash_flows.len() + 1) as u32;
        cash_flows.push(CashFlowEntry {
            period,
            amount: Decimal::ZERO,
        });
        Self { cash_flows, ..self }
    }

    /// Drop the last entry. A record with no entries is returned unchanged.
    pub fn with_removed_period(self) -> Self {
        let mut cash_flows = self.cash_flows;
        cash_flows.pop();
        Self { cash_flows, ..self }
    }

    /// Unweighted sum of all cash flow amounts
    pub fn total_revenue(&self) -> Money {
        self.cash_flows
            .iter()
            .fold(Decimal::ZERO, |acc, cf| acc.saturating_add(cf.amount))
    }

    /// Discount rate as a decimal fraction (15 -> 0.15)
    pub fn rate(&self) -> Rate {
        self.discount_rate / dec!(100)
    }

    /// True when periods run 1, 2, .., n in list order.
    pub fn has_sequential_periods(&self) -> bool {
        self.cash_flows
            .iter()
            .enumerate()
            .all(|(i, cf)| cf.period as usize == i + 1)
    }

    /// Running balance starting at the initial outflow, one point per entry.
    pub fn cumulative_series(&self) -> Vec<ChartPoint> {
        let mut cumulative = -self.initial_investment;
        let mut points = Vec::with_capacity(self.cash_flows.len() + 1);
        points.push(ChartPoint {
            name: "Inv.".into(),
            cash: -self.initial_investment,
            cumulative,
        });
        for cf in &self.cash_flows {
            cumulative = cumulative.saturating_add(cf.amount);
            points.push(ChartPoint {
                name: format!("P{}", cf.period),
                cash: cf.amount,
                cumulative,
            });
        }
        points
    }
}
