use clap::Args;
use serde_json::Value;

use investdash_core::dashboard::DashboardView;
use investdash_core::metrics;
use investdash_core::record::InvestmentRecord;
use investdash_core::validation;

use super::Session;

/// Arguments for setting the initial investment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SetInvestmentArgs {
    /// Initial investment amount (outflow at period 0)
    pub amount: String,
}

/// Arguments for setting the discount rate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SetRateArgs {
    /// Discount rate in percent (e.g. 15 for 15%)
    pub rate: String,
}

/// Arguments for selecting the display currency
#[derive(Args)]
pub struct SetCurrencyArgs {
    /// One of AOA, USD, EUR, BRL
    pub currency: String,
}

/// Arguments for editing one period's cash flow
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SetFlowArgs {
    /// Position of the period in the list, starting at 1
    pub position: usize,

    /// Cash flow amount (negative for an outflow)
    pub amount: String,
}

/// Envelope with metrics, cards, chart series and the record itself.
pub fn dashboard_value(record: &InvestmentRecord) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis = metrics::analyze(record);
    let view = DashboardView::build(record.clone());

    let mut value = serde_json::to_value(&analysis)?;
    if let Value::Object(ref mut map) = value {
        map.insert("cards".into(), serde_json::to_value(&view.cards)?);
        map.insert("chart".into(), serde_json::to_value(&view.chart)?);
        map.insert("record".into(), serde_json::to_value(&view.record)?);
    }
    Ok(value)
}

/// Replace the saved record, persist it and render the new dashboard.
fn commit(session: &Session, record: InvestmentRecord) -> Result<Value, Box<dyn std::error::Error>> {
    session.save(&record);
    dashboard_value(&record)
}

pub fn run_show(session: &Session) -> Result<Value, Box<dyn std::error::Error>> {
    dashboard_value(&session.load())
}

pub fn run_set_investment(
    session: &Session,
    args: SetInvestmentArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let amount = session.number("initial investment", &args.amount, validation::parse_investment)?;
    commit(session, session.load().with_initial_investment(amount))
}

pub fn run_set_rate(session: &Session, args: SetRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rate = session.number("discount rate", &args.rate, validation::parse_discount_rate)?;
    commit(session, session.load().with_discount_rate(rate))
}

pub fn run_set_currency(
    session: &Session,
    args: SetCurrencyArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let currency = validation::parse_currency(&args.currency)
        .map_err(|issue| format!("currency: {issue} (hint: {})", issue.hint()))?;
    commit(session, session.load().with_currency(currency))
}

pub fn run_set_flow(session: &Session, args: SetFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let index = args
        .position
        .checked_sub(1)
        .ok_or("position starts at 1")?;
    let amount = session.number("cash flow", &args.amount, validation::parse_amount)?;
    let record = session.load().with_flow_amount(index, amount)?;
    commit(session, record)
}

pub fn run_add_period(session: &Session) -> Result<Value, Box<dyn std::error::Error>> {
    commit(session, session.load().with_added_period())
}

pub fn run_remove_period(session: &Session) -> Result<Value, Box<dyn std::error::Error>> {
    commit(session, session.load().with_removed_period())
}

pub fn run_reset(session: &Session) -> Result<Value, Box<dyn std::error::Error>> {
    commit(session, InvestmentRecord::default())
}

pub fn run_chart(session: &Session) -> Result<Value, Box<dyn std::error::Error>> {
    let record = session.load();
    Ok(serde_json::json!({
        "currency": record.currency.code(),
        "chart": record.cumulative_series(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::memory_session;
    use investdash_core::currency::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_edit_commits_before_rendering() {
        let session = memory_session(false);
        let value = run_set_investment(
            &session,
            SetInvestmentArgs {
                amount: "750000".into(),
            },
        )
        .unwrap();

        assert_eq!(session.load().initial_investment, dec!(750000));
        assert_eq!(value["record"]["initialInvestment"].as_f64(), Some(750000.0));
        assert_eq!(value["cards"].as_array().map(Vec::len), Some(5));
        assert_eq!(value["chart"].as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn test_rejected_edit_keeps_saved_record() {
        let session = memory_session(false);
        let result = run_set_investment(
            &session,
            SetInvestmentArgs {
                amount: "-5".into(),
            },
        );
        assert!(result.is_err());
        assert_eq!(session.load(), InvestmentRecord::default());
    }

    #[test]
    fn test_lenient_negative_investment_saves_zero() {
        let session = memory_session(true);
        run_set_investment(
            &session,
            SetInvestmentArgs {
                amount: "-5".into(),
            },
        )
        .unwrap();
        assert_eq!(session.load().initial_investment, dec!(0));
    }

    #[test]
    fn test_set_flow_uses_one_based_position() {
        let session = memory_session(false);
        run_set_flow(
            &session,
            SetFlowArgs {
                position: 2,
                amount: "-250".into(),
            },
        )
        .unwrap();
        assert_eq!(session.load().cash_flows[1].amount, dec!(-250));

        let zero = SetFlowArgs {
            position: 0,
            amount: "1".into(),
        };
        assert!(run_set_flow(&session, zero).is_err());

        let past_end = SetFlowArgs {
            position: 6,
            amount: "1".into(),
        };
        assert!(run_set_flow(&session, past_end).is_err());
    }

    #[test]
    fn test_period_edits_and_reset() {
        let session = memory_session(false);
        run_add_period(&session).unwrap();
        assert_eq!(session.load().cash_flows.len(), 6);
        run_remove_period(&session).unwrap();
        run_remove_period(&session).unwrap();
        assert_eq!(session.load().cash_flows.len(), 4);

        run_set_currency(
            &session,
            SetCurrencyArgs {
                currency: "brl".into(),
            },
        )
        .unwrap();
        assert_eq!(session.load().currency, Currency::BRL);

        run_reset(&session).unwrap();
        assert_eq!(session.load(), InvestmentRecord::default());
    }

    #[test]
    fn test_chart_reports_currency_and_series() {
        let session = memory_session(false);
        let value = run_chart(&session).unwrap();
        assert_eq!(value["currency"], "AOA");
        assert_eq!(value["chart"][0]["name"], "Inv.");
        assert_eq!(value["chart"][5]["cumulative"], "5000000");
    }
}
