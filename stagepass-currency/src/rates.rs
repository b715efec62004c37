use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Exchange rates relative to one fixed base currency.
/// Cross-currency conversion always pivots through the base, so the
/// table needs one entry per currency rather than one per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    base: String,
    rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let mut rates = HashMap::new();
        // The base is worth exactly one of itself
        rates.insert(base.clone(), 1.0);
        Self { base, rates }
    }

    pub fn with_rate(mut self, code: impl Into<String>, rate: f64) -> Self {
        self.rates.insert(code.into(), rate);
        self
    }

    pub fn set_rate(&mut self, code: impl Into<String>, rate: f64) {
        self.rates.insert(code.into(), rate);
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Rate for a currency, expressed as units of that currency per one
    /// unit of the base. A missing entry degrades to the identity rate so
    /// the UI always has something to render.
    pub fn rate_for(&self, code: &str) -> f64 {
        match self.rates.get(code) {
            Some(rate) => *rate,
            None => {
                tracing::debug!(currency = code, "no exchange rate, using identity");
                1.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_rate_is_identity() {
        let table = ExchangeRateTable::new("INR").with_rate("USD", 0.012);
        assert_eq!(table.rate_for("USD"), 0.012);
        assert_eq!(table.rate_for("CHF"), 1.0);
        assert_eq!(table.rate_for("INR"), 1.0);
    }
}
