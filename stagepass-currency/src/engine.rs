use crate::currency::{self, currency_for_region};
use crate::money::Money;
use crate::rates::ExchangeRateTable;

/// Pure conversion and formatting over a rate table. Every price a screen
/// shows goes through here so amounts never drift between views.
#[derive(Debug, Clone)]
pub struct CurrencyConversionEngine {
    rates: ExchangeRateTable,
}

impl CurrencyConversionEngine {
    pub fn new(rates: ExchangeRateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    /// The currency a given amount will actually be displayed in: the
    /// requested one if supported, else the amount's own currency.
    pub fn display_currency<'a>(&self, amount: &'a Money, to: &'a str) -> &'a str {
        if currency::is_supported(to) {
            to
        } else {
            tracing::debug!(requested = to, "unsupported display currency, falling back to base");
            &amount.currency
        }
    }

    /// Convert to minor units of the target currency, pivoting through the
    /// table's base. Returns an unrounded float; formatting rounds once at
    /// the end.
    pub fn convert(&self, amount: &Money, to: &str) -> f64 {
        let target = self.display_currency(amount, to);
        if amount.is_same_currency(target) {
            return amount.minor_units as f64;
        }
        let from_rate = self.rates.rate_for(&amount.currency);
        let to_rate = self.rates.rate_for(target);
        let scale = 10f64.powi(decimals_of(target) as i32 - decimals_of(&amount.currency) as i32);
        amount.minor_units as f64 * scale / from_rate * to_rate
    }

    /// Render a minor-unit value: divide by 10^decimals, round to the
    /// currency's precision, apply symbol and locale digit grouping.
    /// Unknown codes get a generic "CODE amount" string; never panics.
    pub fn format(&self, minor_value: f64, code: &str) -> String {
        match currency::lookup(code) {
            Some(cur) => {
                let major = minor_value / 10f64.powi(cur.decimals as i32);
                format!("{}{}", cur.symbol, format_fixed(major, cur.decimals, cur.locale))
            }
            None => format!("{} {:.2}", code, minor_value / 100.0),
        }
    }

    /// Convert then format in one step
    pub fn display(&self, amount: &Money, to: &str) -> String {
        let target = self.display_currency(amount, to).to_string();
        let value = self.convert(amount, &target);
        self.format(value, &target)
    }
}

fn decimals_of(code: &str) -> u32 {
    currency::lookup(code).map_or(2, |c| c.decimals)
}

/// Fixed-point rendering with locale-dependent digit grouping.
/// Indian locales group the last three digits then pairs (1,23,456.78);
/// everything else groups in threes.
fn format_fixed(value: f64, decimals: u32, locale: &str) -> String {
    let negative = value < 0.0;
    let factor = 10f64.powi(decimals as i32);
    let scaled = (value.abs() * factor).round() as i64;
    let int_part = scaled / factor as i64;
    let frac_part = scaled % factor as i64;

    let grouped = group_digits(&int_part.to_string(), locale);
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if decimals > 0 {
        out.push('.');
        out.push_str(&format!("{:0width$}", frac_part, width = decimals as usize));
    }
    out
}

fn group_digits(digits: &str, locale: &str) -> String {
    let indian = locale.ends_with("-IN");
    let bytes = digits.as_bytes();
    let len = bytes.len();
    let mut groups: Vec<&str> = Vec::new();
    let mut end = len;
    let mut first = true;
    while end > 0 {
        let size = if first || !indian { 3 } else { 2 };
        let start = end.saturating_sub(size);
        groups.push(&digits[start..end]);
        end = start;
        first = false;
    }
    groups.reverse();
    groups.join(",")
}

/// Derive a default currency from the process locale (LC_ALL, LC_MONETARY,
/// LANG in that order). Unknown or absent regions use the configured
/// fallback, which need not be the rate table's base.
pub fn detect_preferred_currency(fallback: &str) -> String {
    for var in ["LC_ALL", "LC_MONETARY", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            if let Some(code) = locale_region(&value).and_then(currency_for_region) {
                return code.to_string();
            }
        }
    }
    fallback.to_string()
}

/// Extract the region subtag from a POSIX-style locale string,
/// e.g. "en_IN.UTF-8" -> "IN"
fn locale_region(locale: &str) -> Option<&str> {
    let trimmed = locale.split(['.', '@']).next()?;
    let region = trimmed.split(['_', '-']).nth(1)?;
    if region.len() == 2 && region.chars().all(|c| c.is_ascii_uppercase()) {
        Some(region)
    } else {
        None
    }
}
