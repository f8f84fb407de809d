use clap::Args;
use serde_json::Value;

use investdash_core::currency::Currency;
use investdash_core::record::InvestmentRecord;
use investdash_core::validation;

use super::dashboard::dashboard_value;
use super::Session;
use crate::input;

/// Arguments for a one-off metrics computation
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to a JSON or YAML scenario file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Initial investment (outflow at period 0)
    #[arg(long, allow_hyphen_values = true)]
    pub investment: Option<String>,

    /// Discount rate in percent (e.g. 15 for 15%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<String>,

    /// Display currency
    #[arg(long)]
    pub currency: Option<String>,

    /// Period cash flows, comma-separated (e.g. "1000000,1500000,-200000")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Option<Vec<String>>,
}

impl MetricsArgs {
    fn has_flags(&self) -> bool {
        self.investment.is_some() || self.rate.is_some() || self.currency.is_some() || self.cash_flows.is_some()
    }
}

/// Compute metrics without touching the saved scenario.
///
/// Source order: `--input` file, flags, piped stdin, then the saved scenario.
/// Flags left out fall back to the saved scenario's values.
pub fn run_metrics(session: &Session, args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let record: InvestmentRecord = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if args.has_flags() {
        record_from_flags(session, &args)?
    } else if let Some(record) = input::stdin::read_stdin::<InvestmentRecord>()? {
        record
    } else {
        session.load()
    };

    dashboard_value(&record)
}

fn record_from_flags(
    session: &Session,
    args: &MetricsArgs,
) -> Result<InvestmentRecord, Box<dyn std::error::Error>> {
    let base = session.load();

    let investment = match args.investment {
        Some(ref raw) => session.number("investment", raw, validation::parse_investment)?,
        None => base.initial_investment,
    };
    let rate = match args.rate {
        Some(ref raw) => session.number("rate", raw, validation::parse_discount_rate)?,
        None => base.discount_rate,
    };
    let currency: Currency = match args.currency {
        Some(ref raw) => validation::parse_currency(raw)
            .map_err(|issue| format!("currency: {issue} (hint: {})", issue.hint()))?,
        None => base.currency,
    };

    match args.cash_flows {
        Some(ref raws) => {
            let amounts = raws
                .iter()
                .map(|raw| session.number("cash flow", raw, validation::parse_amount))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(InvestmentRecord::from_amounts(investment, rate, currency, &amounts))
        }
        None => Ok(base
            .with_initial_investment(investment)
            .with_discount_rate(rate)
            .with_currency(currency)),
    }
}
