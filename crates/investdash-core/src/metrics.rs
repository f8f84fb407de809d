//! Capital-budgeting indicators for an [`InvestmentRecord`].
//!
//! Every function here is pure and total. Degenerate inputs produce defined
//! values instead of errors:
//!
//! * payback never reached returns [`PAYBACK_NOT_RECOVERED`] (-1);
//! * ROI and profitability index are `None` when the initial investment is 0;
//! * an IRR that does not converge is reported as 0 with `irr_converged = false`.
//!
//! NPV discounts each entry by its declared `period`; IRR places entries at
//! consecutive periods 1..n by list position and ignores `period`. The two
//! agree only when periods are sequential. [`analyze`] warns when they are not.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::record::InvestmentRecord;
use crate::time_value::{self, IrrSolution, IRR_INITIAL_GUESS};
use crate::types::*;
use crate::InvestDashResult;

/// Payback sentinel for "not recovered within the given horizon"
pub const PAYBACK_NOT_RECOVERED: Periods = dec!(-1);

/// Derived indicators, recomputed from the record on every read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    /// Net Present Value at the record's discount rate
    pub npv: Money,
    /// Internal Rate of Return, as a percentage (0 when not converged)
    pub irr: Percent,
    pub irr_converged: bool,
    /// Return on investment, as a percentage
    pub roi: Option<Percent>,
    /// Periods until the cumulative balance turns non-negative, or -1
    pub payback: Periods,
    /// Unweighted sum of all cash flow amounts
    pub total_revenue: Money,
    pub profitability_index: Option<Multiple>,
}

pub fn compute_npv(record: &InvestmentRecord) -> Money {
    time_value::npv_by_period(record.rate(), record.initial_investment, &record.cash_flows)
}

/// Flow vector for IRR: `-initial_investment` followed by amounts in list order.
fn irr_flows(record: &InvestmentRecord) -> Vec<Money> {
    std::iter::once(-record.initial_investment)
        .chain(record.cash_flows.iter().map(|cf| cf.amount))
        .collect()
}

fn to_percent(rate: Rate) -> Percent {
    rate.checked_mul(dec!(100)).unwrap_or(Decimal::ZERO)
}

/// Solve IRR, surfacing non-convergence as an error.
pub fn solve_irr(record: &InvestmentRecord) -> InvestDashResult<IrrSolution> {
    time_value::irr(&irr_flows(record), IRR_INITIAL_GUESS)
}

/// IRR as a percentage; 0 when Newton-Raphson does not converge.
pub fn compute_irr(record: &InvestmentRecord) -> Percent {
    match solve_irr(record) {
        Ok(solution) => to_percent(solution.rate),
        Err(e) => {
            tracing::warn!(error = %e, "IRR did not converge, reporting 0");
            Decimal::ZERO
        }
    }
}

/// Simple payback with linear interpolation inside the crossing period.
pub fn compute_payback(record: &InvestmentRecord) -> Periods {
    let mut balance = -record.initial_investment;

    for (i, cf) in record.cash_flows.iter().enumerate() {
        let previous = balance;
        balance = balance.saturating_add(cf.amount);
        if balance >= Decimal::ZERO {
            let index = Decimal::from(i as u64);
            // A zero amount can only cross when the balance was already 0.
            return match previous.abs().checked_div(cf.amount) {
                Some(fraction) => index + fraction,
                None => index,
            };
        }
    }

    PAYBACK_NOT_RECOVERED
}

/// `(total_revenue - investment) / investment * 100`; `None` for a zero investment.
pub fn compute_roi(record: &InvestmentRecord) -> Option<Percent> {
    let investment = record.initial_investment;
    if investment.is_zero() {
        return None;
    }
    record
        .total_revenue()
        .checked_sub(investment)?
        .checked_div(investment)?
        .checked_mul(dec!(100))
}

/// `(npv + investment) / investment`; `None` for a zero investment.
pub fn compute_profitability_index(record: &InvestmentRecord, npv: Money) -> Option<Multiple> {
    let investment = record.initial_investment;
    if investment.is_zero() {
        return None;
    }
    npv.checked_add(investment)?.checked_div(investment)
}

pub fn get_full_metrics(record: &InvestmentRecord) -> FinancialMetrics {
    let npv = compute_npv(record);
    let (irr, irr_converged) = match solve_irr(record) {
        Ok(solution) => (to_percent(solution.rate), true),
        Err(e) => {
            tracing::debug!(error = %e, "IRR fallback to 0");
            (Decimal::ZERO, false)
        }
    };

    FinancialMetrics {
        npv,
        irr,
        irr_converged,
        roi: compute_roi(record),
        payback: compute_payback(record),
        total_revenue: record.total_revenue(),
        profitability_index: compute_profitability_index(record, npv),
    }
}

/// Full metrics wrapped with methodology, assumptions and warnings.
pub fn analyze(record: &InvestmentRecord) -> ComputationOutput<FinancialMetrics> {
    let start = Instant::now();
    let metrics = get_full_metrics(record);
    let mut warnings: Vec<String> = Vec::new();

    if !metrics.irr_converged {
        warnings.push("IRR did not converge within 1000 Newton-Raphson iterations; reported as 0".into());
    }
    if metrics.roi.is_none() {
        warnings.push("Initial investment is zero; ROI and profitability index are undefined".into());
    }
    if metrics.payback == PAYBACK_NOT_RECOVERED {
        warnings.push("Investment is not recovered within the given periods".into());
    }
    if !record.has_sequential_periods() {
        warnings.push(
            "Periods are not 1..n in order; NPV uses declared periods while IRR and payback use list position"
                .into(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Capital budgeting: NPV, IRR (Newton-Raphson), simple payback, ROI, profitability index",
        &serde_json::json!({
            "initial_investment": record.initial_investment.to_string(),
            "discount_rate_pct": record.discount_rate.to_string(),
            "periods": record.cash_flows.len(),
            "currency": record.currency.code(),
        }),
        warnings,
        elapsed,
        metrics,
    )
}
