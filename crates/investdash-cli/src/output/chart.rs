use colored::Colorize;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

const HALF_WIDTH: usize = 30;

struct Bar {
    name: String,
    cash: Decimal,
    cumulative: Decimal,
}

fn parse_decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::String(s)) => Decimal::from_str(s).unwrap_or_default(),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string()).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

fn parse_points(points: &[Value]) -> Vec<Bar> {
    points
        .iter()
        .filter_map(|p| {
            let name = p.get("name")?.as_str()?.to_string();
            Some(Bar {
                name,
                cash: parse_decimal(p.get("cash")),
                cumulative: parse_decimal(p.get("cumulative")),
            })
        })
        .collect()
}

/// Thousands with a `k` suffix, one decimal place.
fn short_label(value: Decimal) -> String {
    let thousands = (value / Decimal::ONE_THOUSAND)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}k", thousands)
}

fn scaled(value: Decimal, max_abs: Decimal) -> usize {
    if max_abs.is_zero() {
        return 0;
    }
    let ratio = (value.abs() / max_abs).to_f64().unwrap_or(0.0);
    ((ratio * HALF_WIDTH as f64).round() as usize).min(HALF_WIDTH)
}

/// Horizontal bar chart of the cumulative balance around a zero axis.
///
/// Negative balances extend left in red, positive ones right in green.
pub fn print_chart(points: &[Value]) {
    let bars = parse_points(points);
    if bars.is_empty() {
        println!("(no chart data)");
        return;
    }

    let max_abs = bars
        .iter()
        .map(|b| b.cumulative.abs())
        .max()
        .unwrap_or(Decimal::ZERO);
    let name_width = bars.iter().map(|b| b.name.len()).max().unwrap_or(0);

    println!("\nCumulative cash flow");
    for bar in &bars {
        let len = scaled(bar.cumulative, max_abs);
        let (left, right) = if bar.cumulative.is_sign_negative() && !bar.cumulative.is_zero() {
            (
                format!("{:>width$}", "█".repeat(len), width = HALF_WIDTH).red().to_string(),
                " ".repeat(HALF_WIDTH),
            )
        } else {
            (
                " ".repeat(HALF_WIDTH),
                format!("{:<width$}", "█".repeat(len), width = HALF_WIDTH).green().to_string(),
            )
        };
        println!(
            "  {:<name_width$} {}│{} {:>10} ({})",
            bar.name,
            left,
            right,
            short_label(bar.cumulative),
            short_label(bar.cash).as_str().dimmed(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_short_label() {
        assert_eq!(short_label(dec!(-5000000)), "-5000.0k");
        assert_eq!(short_label(dec!(1250)), "1.3k");
        assert_eq!(short_label(Decimal::ZERO), "0.0k");
    }

    #[test]
    fn test_scaled_bars() {
        assert_eq!(scaled(dec!(-5000000), dec!(5000000)), HALF_WIDTH);
        assert_eq!(scaled(dec!(2500000), dec!(5000000)), HALF_WIDTH / 2);
        assert_eq!(scaled(dec!(10), Decimal::ZERO), 0);
    }

    #[test]
    fn test_parse_points_reads_decimal_strings() {
        let points = vec![
            json!({"name": "Inv.", "cash": "-5000000", "cumulative": "-5000000"}),
            json!({"name": "P1", "cash": "1000000", "cumulative": "-4000000"}),
            json!({"cash": "1"}),
        ];
        let bars = parse_points(&points);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].name, "P1");
        assert_eq!(bars[1].cumulative, dec!(-4000000));
    }
}
