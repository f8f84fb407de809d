//! Display currencies for the dashboard.
//!
//! Currency selection only changes how amounts are rendered. No conversion
//! ever happens: the engine sees the same numbers whichever code is active.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::InvestDashError;

/// Supported display currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    AOA,
    USD,
    EUR,
    BRL,
}

/// Static registry entry for a currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyConfig {
    pub code: &'static str,
    pub symbol: &'static str,
    pub locale: &'static str,
    #[serde(skip)]
    style: NumberStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumberStyle {
    group_separator: &'static str,
    decimal_separator: &'static str,
    symbol_first: bool,
    symbol_spaced: bool,
}

const AOA_CONFIG: CurrencyConfig = CurrencyConfig {
    code: "AOA",
    symbol: "Kz",
    locale: "pt-AO",
    style: NumberStyle {
        group_separator: " ",
        decimal_separator: ",",
        symbol_first: false,
        symbol_spaced: true,
    },
};

const USD_CONFIG: CurrencyConfig = CurrencyConfig {
    code: "USD",
    symbol: "$",
    locale: "en-US",
    style: NumberStyle {
        group_separator: ",",
        decimal_separator: ".",
        symbol_first: true,
        symbol_spaced: false,
    },
};

const EUR_CONFIG: CurrencyConfig = CurrencyConfig {
    code: "EUR",
    symbol: "€",
    locale: "de-DE",
    style: NumberStyle {
        group_separator: ".",
        decimal_separator: ",",
        symbol_first: false,
        symbol_spaced: true,
    },
};

const BRL_CONFIG: CurrencyConfig = CurrencyConfig {
    code: "BRL",
    symbol: "R$",
    locale: "pt-BR",
    style: NumberStyle {
        group_separator: ".",
        decimal_separator: ",",
        symbol_first: true,
        symbol_spaced: true,
    },
};

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::AOA, Currency::USD, Currency::EUR, Currency::BRL];

    pub const fn config(self) -> &'static CurrencyConfig {
        match self {
            Currency::AOA => &AOA_CONFIG,
            Currency::USD => &USD_CONFIG,
            Currency::EUR => &EUR_CONFIG,
            Currency::BRL => &BRL_CONFIG,
        }
    }

    pub const fn code(self) -> &'static str {
        self.config().code
    }

    pub const fn symbol(self) -> &'static str {
        self.config().symbol
    }

    pub const fn locale(self) -> &'static str {
        self.config().locale
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = InvestDashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == wanted)
            .ok_or_else(|| InvestDashError::InvalidInput {
                field: "currency".into(),
                reason: format!("unsupported currency '{}', expected one of AOA, USD, EUR, BRL", s.trim()),
            })
    }
}

/// Fixed-point rendering with half-away-from-zero rounding, e.g. `to_fixed(1.247, 2) == "1.25"`.
pub fn to_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Format an amount with two fraction digits using the currency's locale
/// separators, without the symbol.
pub fn format_number(value: Decimal, currency: Currency) -> String {
    let style = currency.config().style;
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let digits = to_fixed(rounded.abs(), 2);
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push_str(style.group_separator);
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}{}{frac_part}", style.decimal_separator)
}

/// Format an amount as a currency string, e.g. `$1,234.50` or `1.234,50 €`.
pub fn format_currency(value: Decimal, currency: Currency) -> String {
    let config = currency.config();
    let style = config.style;
    let number = format_number(value, currency);
    let (sign, magnitude) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number.as_str()),
    };
    let gap = if style.symbol_spaced { " " } else { "" };

    if style.symbol_first {
        format!("{sign}{}{gap}{magnitude}", config.symbol)
    } else {
        format!("{sign}{magnitude}{gap}{}", config.symbol)
    }
}
