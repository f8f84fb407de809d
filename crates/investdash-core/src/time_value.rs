use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::InvestDashError;
use crate::record::CashFlowEntry;
use crate::types::{Money, Rate};
use crate::InvestDashResult;

pub const IRR_INITIAL_GUESS: Rate = dec!(0.1);
const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
pub const MAX_IRR_ITERATIONS: u32 = 1000;

/// Converged IRR root, as a decimal rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrSolution {
    pub rate: Rate,
    pub iterations: u32,
}

/// `(1 + rate)^period`, or `None` when the power overflows.
pub fn discount_factor(rate: Rate, period: u32) -> Option<Decimal> {
    (Decimal::ONE + rate).checked_powi(i64::from(period))
}

/// Divide without ever failing: a zero or vanishing divisor saturates to the
/// largest representable magnitude carrying the sign of the quotient.
fn saturating_div(numerator: Money, denominator: Decimal) -> Money {
    if let Some(q) = numerator.checked_div(denominator) {
        return q;
    }
    if numerator.is_zero() {
        return Decimal::ZERO;
    }
    let negative = numerator.is_sign_negative() != (denominator.is_sign_negative() && !denominator.is_zero());
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Net Present Value with each entry discounted by its declared period.
///
/// `NPV = -initial_outflow + Σ amount / (1 + rate)^period`. Never fails:
/// a factor that overflows contributes nothing, a zero factor saturates.
pub fn npv_by_period(rate: Rate, initial_outflow: Money, flows: &[CashFlowEntry]) -> Money {
    flows.iter().fold(-initial_outflow, |acc, cf| {
        let term = match discount_factor(rate, cf.period) {
            Some(factor) => saturating_div(cf.amount, factor),
            None => Decimal::ZERO,
        };
        acc.saturating_add(term)
    })
}

/// `f(r) = Σ flow_t / (1+r)^t` and `f'(r) = Σ -t·flow_t / (1+r)^(t+1)`.
fn npv_and_derivative(rate: Rate, cash_flows: &[Money]) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut value = Decimal::ZERO;
    let mut derivative = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        let t = t as i64;
        let discount = one_plus_r.checked_powi(t)?;
        value = value.checked_add(cf.checked_div(discount)?)?;
        if t > 0 {
            let discount_next = discount.checked_mul(one_plus_r)?;
            let weighted = Decimal::from(t).checked_mul(*cf)?;
            derivative = derivative.checked_sub(weighted.checked_div(discount_next)?)?;
        }
    }

    Some((value, derivative))
}

/// Internal Rate of Return by plain Newton-Raphson.
///
/// `cash_flows[t]` occurs at period `t`. Converges when successive rates
/// differ by less than 1e-7. There is no bracketing and no clamping, so a
/// sequence without a sign change or with a flat derivative fails with
/// `ConvergenceFailure`.
pub fn irr(cash_flows: &[Money], guess: Rate) -> InvestDashResult<IrrSolution> {
    let mut rate = guess;
    let mut last_delta = Decimal::ZERO;

    for i in 0..MAX_IRR_ITERATIONS {
        let (value, derivative) =
            npv_and_derivative(rate, cash_flows).ok_or_else(|| InvestDashError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta,
            })?;

        let step = value
            .checked_div(derivative)
            .ok_or_else(|| InvestDashError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: value,
            })?;

        let next = rate.checked_sub(step).ok_or_else(|| InvestDashError::ConvergenceFailure {
            function: "IRR".into(),
            iterations: i,
            last_delta: step,
        })?;

        last_delta = (next - rate).abs();
        if last_delta < CONVERGENCE_THRESHOLD {
            return Ok(IrrSolution {
                rate: next,
                iterations: i + 1,
            });
        }
        rate = next;
    }

    Err(InvestDashError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entries(amounts: &[Money]) -> Vec<CashFlowEntry> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, a)| CashFlowEntry {
                period: (i + 1) as u32,
                amount: *a,
            })
            .collect()
    }

    #[test]
    fn test_npv_basic() {
        let result = npv_by_period(dec!(0.10), dec!(1000), &entries(&[dec!(300), dec!(400), dec!(500)]));
        // NPV at 10%: -1000 + 300/1.1 + 400/1.21 + 500/1.331 ≈ -21.04
        assert!((result - dec!(-21.04)).abs() < dec!(0.01));
    }

    #[test]
    fn test_npv_zero_rate() {
        let result = npv_by_period(dec!(0), dec!(100), &entries(&[dec!(50), dec!(50), dec!(50)]));
        assert_eq!(result, dec!(50));
    }

    #[test]
    fn test_npv_uses_declared_period() {
        let flows = vec![CashFlowEntry {
            period: 2,
            amount: dec!(121),
        }];
        let result = npv_by_period(dec!(0.10), dec!(0), &flows);
        assert!((result - dec!(100)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_npv_total_at_minus_hundred_percent() {
        let result = npv_by_period(dec!(-1), dec!(10), &entries(&[dec!(5)]));
        // -10 + 5/0 saturates toward the largest representable value
        assert!(result > Decimal::MAX - dec!(100));
    }

    #[test]
    fn test_irr_basic() {
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let result = irr(&cfs, IRR_INITIAL_GUESS).unwrap();
        // IRR should be ~9.7%
        assert!((result.rate - dec!(0.097)).abs() < dec!(0.001));
    }

    #[test]
    fn test_irr_no_sign_change_fails() {
        let cfs = vec![dec!(100), dec!(100), dec!(100)];
        assert!(matches!(
            irr(&cfs, IRR_INITIAL_GUESS),
            Err(InvestDashError::ConvergenceFailure { .. })
        ));
    }

    #[test]
    fn test_irr_single_flow_has_zero_derivative() {
        assert!(irr(&[dec!(-100)], IRR_INITIAL_GUESS).is_err());
    }
}
