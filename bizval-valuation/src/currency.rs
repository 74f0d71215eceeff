//! Currency formatting.
//!
//! A fixed table of supported currencies, each with a symbol, its placement,
//! a digit-grouping scheme, and a group separator. Values are rendered with
//! zero decimals, rounded half away from zero.

use serde::{Deserialize, Serialize};

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    /// `$1,000`
    Prefix,
    /// `1,000 KWD`
    Suffix,
}

/// Digit grouping scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Groups of three: 1,234,567
    Thousands,
    /// Last three, then groups of two: 12,34,567
    Indian,
}

/// Rendering rules for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyStyle {
    pub code: &'static str,
    pub symbol: &'static str,
    pub locale: &'static str,
    pub placement: SymbolPlacement,
    pub grouping: Grouping,
    pub group_separator: char,
}

const USD: CurrencyStyle = CurrencyStyle {
    code: "usd",
    symbol: "$",
    locale: "en-US",
    placement: SymbolPlacement::Prefix,
    grouping: Grouping::Thousands,
    group_separator: ',',
};

const EUR: CurrencyStyle = CurrencyStyle {
    code: "eur",
    symbol: "€",
    locale: "de-DE",
    placement: SymbolPlacement::Prefix,
    grouping: Grouping::Thousands,
    group_separator: '.',
};

const GBP: CurrencyStyle = CurrencyStyle {
    code: "gbp",
    symbol: "£",
    locale: "en-GB",
    placement: SymbolPlacement::Prefix,
    grouping: Grouping::Thousands,
    group_separator: ',',
};

const INR: CurrencyStyle = CurrencyStyle {
    code: "inr",
    symbol: "₹",
    locale: "en-IN",
    placement: SymbolPlacement::Prefix,
    grouping: Grouping::Indian,
    group_separator: ',',
};

const KWD: CurrencyStyle = CurrencyStyle {
    code: "kwd",
    symbol: "KWD",
    locale: "en-US",
    placement: SymbolPlacement::Suffix,
    grouping: Grouping::Thousands,
    group_separator: ',',
};

/// Supported currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Inr,
    Kwd,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Inr,
        Currency::Kwd,
    ];

    /// Parse a code (case-insensitive). Returns `None` for unsupported codes.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.style().code == code)
    }

    /// Resolve a code, falling back to USD.
    pub fn from_code(code: &str) -> Self {
        Self::parse(code).unwrap_or_default()
    }

    pub fn style(self) -> &'static CurrencyStyle {
        match self {
            Self::Usd => &USD,
            Self::Eur => &EUR,
            Self::Gbp => &GBP,
            Self::Inr => &INR,
            Self::Kwd => &KWD,
        }
    }

    pub fn code(self) -> &'static str {
        self.style().code
    }

    /// Render a value in this currency.
    pub fn format(self, value: f64) -> String {
        let style = self.style();
        let rounded = if value.is_finite() { value.round() } else { 0.0 };
        let sign = if rounded < 0.0 { "-" } else { "" };
        let digits = format!("{:.0}", rounded.abs());
        let grouped = group_digits(&digits, style.grouping, style.group_separator);

        match style.placement {
            SymbolPlacement::Prefix => format!("{sign}{}{grouped}", style.symbol),
            SymbolPlacement::Suffix => format!("{sign}{grouped} {}", style.symbol),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code().to_uppercase())
    }
}

/// Format `value` for the given currency code. Unknown codes format as USD.
pub fn format_currency_value(value: f64, currency_code: &str) -> String {
    Currency::from_code(currency_code).format(value)
}

/// Render a count with en-US grouping and no decimals, e.g. `12,500`.
pub fn format_number(value: f64) -> String {
    let rounded = if value.is_finite() { value.round() } else { 0.0 };
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}{}", group_digits(&digits, Grouping::Thousands, ','))
}

fn group_digits(digits: &str, grouping: Grouping, separator: char) -> String {
    match grouping {
        Grouping::Thousands => group_from_right(digits, 3, separator),
        Grouping::Indian => {
            if digits.len() <= 3 {
                return digits.to_string();
            }
            let (head, tail) = digits.split_at(digits.len() - 3);
            format!("{}{separator}{tail}", group_from_right(head, 2, separator))
        }
    }
}

// ASCII digits only, so byte length equals char count.
fn group_from_right(digits: &str, size: usize, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / size);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % size == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
