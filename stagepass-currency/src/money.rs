use serde::{Deserialize, Serialize};

/// An amount in the smallest unit of a currency (paise, cents).
/// Kept integral until final display so rounding never compounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money {
    pub minor_units: i64,
    pub currency: String,
}

impl Money {
    pub fn new(minor_units: i64, currency: impl Into<String>) -> Self {
        Self {
            minor_units,
            currency: currency.into(),
        }
    }

    /// Scale by a quantity, staying in the same currency
    pub fn scaled(&self, quantity: u32) -> Money {
        Money {
            minor_units: self.minor_units * i64::from(quantity),
            currency: self.currency.clone(),
        }
    }

    pub fn is_same_currency(&self, code: &str) -> bool {
        self.currency == code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling() {
        let price = Money::new(490_000, "INR");
        let total = price.scaled(2);
        assert_eq!(total.minor_units, 980_000);
        assert_eq!(total.currency, "INR");
    }
}
