use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use super::chart;

/// Decimal strings longer than this many places are rounded for display.
const DISPLAY_DP: u32 = 6;

/// Format output as tables using the tabled crate.
///
/// A dashboard envelope prints its metric cards, the raw metrics, the
/// cumulative chart and any narrative, followed by warnings.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            let mut printed = false;

            if let Some(Value::Array(cards)) = map.get("cards") {
                print_cards(cards);
                printed = true;
            }
            if let Some(result) = map.get("result") {
                print_result_table(result);
                printed = true;
            }
            if let Some(Value::Array(points)) = map.get("chart") {
                chart::print_chart(points);
                printed = true;
            }
            if let Some(Value::String(text)) = map.get("narrative") {
                print_narrative(text, map.get("error"));
                printed = true;
            }

            if printed {
                print_notes(map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_cards(cards: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value", "Trend", "Description"]);
    for card in cards {
        let field = |name| text_field(card, name);
        let trend = match field("trend") {
            "up" => "▲".green().to_string(),
            "down" => "▼".red().to_string(),
            _ => "•".dimmed().to_string(),
        };
        builder.push_record([
            field("label").to_string(),
            field("value").to_string(),
            trend,
            field("description").to_string(),
        ]);
    }
    println!("{}", Table::from(builder));
}

fn text_field<'a>(value: &'a Value, name: &str) -> &'a str {
    value.get(name).and_then(Value::as_str).unwrap_or_default()
}

fn print_result_table(result: &Value) {
    if let Value::Object(res_map) = result {
        println!();
        print_flat_object(&Value::Object(res_map.clone()));
    } else {
        println!("{}", format_value(result));
    }
}

fn print_narrative(text: &str, error: Option<&Value>) {
    println!("\n{}", "Executive insight".bold());
    for paragraph in text.split("\n\n") {
        println!("  {}", paragraph.trim());
    }
    if let Some(Value::String(err)) = error {
        println!("  {}", err.dimmed());
    }
}

fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow());
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => match Decimal::from_str(s) {
            Ok(d) if d.scale() > DISPLAY_DP => d.round_dp(DISPLAY_DP).normalize().to_string(),
            _ => s.clone(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
