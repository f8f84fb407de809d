use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::currency::{format_currency, to_fixed};
use crate::metrics::{get_full_metrics, FinancialMetrics, PAYBACK_NOT_RECOVERED};
use crate::record::{ChartPoint, InvestmentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// One headline indicator as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub description: String,
    pub trend: Trend,
}

/// Everything the presentation layer renders for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub record: InvestmentRecord,
    pub metrics: FinancialMetrics,
    pub cards: Vec<MetricCard>,
    pub chart: Vec<ChartPoint>,
}

impl DashboardView {
    pub fn build(record: InvestmentRecord) -> Self {
        let metrics = get_full_metrics(&record);
        let cards = metric_cards(&record, &metrics);
        let chart = record.cumulative_series();
        Self {
            record,
            metrics,
            cards,
            chart,
        }
    }
}

fn card(label: &str, value: String, description: &str, trend: Trend) -> MetricCard {
    MetricCard {
        label: label.to_string(),
        value,
        description: description.to_string(),
        trend,
    }
}

pub fn metric_cards(record: &InvestmentRecord, metrics: &FinancialMetrics) -> Vec<MetricCard> {
    let npv_trend = if metrics.npv > Decimal::ZERO {
        Trend::Up
    } else {
        Trend::Down
    };

    let irr_trend = if metrics.irr > record.discount_rate {
        Trend::Up
    } else {
        Trend::Down
    };

    // Fast payback: recovered within the first half of the horizon.
    let half_horizon = Decimal::from(record.cash_flows.len() as u64) / dec!(2);
    let (payback_value, payback_trend) = if metrics.payback == PAYBACK_NOT_RECOVERED {
        ("N/A".to_string(), Trend::Neutral)
    } else {
        let trend = if metrics.payback > Decimal::ZERO && metrics.payback <= half_horizon {
            Trend::Up
        } else {
            Trend::Neutral
        };
        (format!("{} periods", to_fixed(metrics.payback, 1)), trend)
    };

    let (roi_value, roi_trend) = match metrics.roi {
        Some(roi) if roi > dec!(50) => (format!("{}%", to_fixed(roi, 1)), Trend::Up),
        Some(roi) => (format!("{}%", to_fixed(roi, 1)), Trend::Neutral),
        None => ("N/A".to_string(), Trend::Neutral),
    };

    let (pi_value, pi_trend) = match metrics.profitability_index {
        Some(pi) if pi > Decimal::ONE => (format!("{}x", to_fixed(pi, 2)), Trend::Up),
        Some(pi) if pi < Decimal::ONE => (format!("{}x", to_fixed(pi, 2)), Trend::Down),
        Some(pi) => (format!("{}x", to_fixed(pi, 2)), Trend::Neutral),
        None => ("N/A".to_string(), Trend::Neutral),
    };

    let irr_value = if metrics.irr_converged {
        format!("{}%", to_fixed(metrics.irr, 2))
    } else {
        "0.00% (no convergence)".to_string()
    };

    vec![
        card(
            "NPV",
            format_currency(metrics.npv, record.currency),
            "Net present value",
            npv_trend,
        ),
        card("IRR", irr_value, "Internal rate of return", irr_trend),
        card("Payback", payback_value, "Capital recovery", payback_trend),
        card("ROI", roi_value, "Return on investment", roi_trend),
        card("PI", pi_value, "Profitability index", pi_trend),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_cards() {
        let view = DashboardView::build(InvestmentRecord::default());
        let labels: Vec<&str> = view.cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["NPV", "IRR", "Payback", "ROI", "PI"]);

        assert_eq!(view.cards[0].value, "1 239 726,50 Kz");
        assert_eq!(view.cards[0].trend, Trend::Up);
        assert_eq!(view.cards[1].value, "23.29%");
        assert_eq!(view.cards[1].trend, Trend::Up);
        // 3.2 > 5 / 2
        assert_eq!(view.cards[2].value, "3.2 periods");
        assert_eq!(view.cards[2].trend, Trend::Neutral);
        assert_eq!(view.cards[3].value, "100.0%");
        assert_eq!(view.cards[3].trend, Trend::Up);
        assert_eq!(view.cards[4].value, "1.25x");
        assert_eq!(view.chart.len(), 6);
    }

    #[test]
    fn test_unrecovered_payback_card() {
        let record = InvestmentRecord::from_amounts(dec!(1000), dec!(10), Currency::USD, &[dec!(100)]);
        let view = DashboardView::build(record);
        assert_eq!(view.cards[2].value, "N/A");
        assert_eq!(view.cards[0].trend, Trend::Down);
        assert_eq!(view.cards[0].value, "-$909.09");
    }

    #[test]
    fn test_zero_investment_cards() {
        let record = InvestmentRecord::from_amounts(dec!(0), dec!(10), Currency::EUR, &[dec!(100)]);
        let view = DashboardView::build(record);
        assert_eq!(view.cards[3].value, "N/A");
        assert_eq!(view.cards[4].value, "N/A");
    }
}
