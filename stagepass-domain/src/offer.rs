use serde::{Deserialize, Serialize};
use stagepass_currency::Money;
use uuid::Uuid;

/// Where an offer came from. Resolved once when a flow starts; seeded
/// sample offers never touch the backend for holds or bookings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferSource {
    Backend,
    Seeded,
}

/// A purchasable ticket tier for an event. Immutable within one flow;
/// the catalog owns the record, the core reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketOffer {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub unit_price: Money,
    pub available_quantity: u32,
    pub total_quantity: u32,
    /// Offers not opted into multi-currency always charge in their base
    /// currency, whatever the viewer's locale says.
    pub multi_currency_enabled: bool,
    pub supported_currencies: Vec<String>,
    pub source: OfferSource,
}

impl TicketOffer {
    pub fn base_currency(&self) -> &str {
        &self.unit_price.currency
    }

    /// True when this offer may be charged in the given display currency
    pub fn accepts_currency(&self, code: &str) -> bool {
        self.multi_currency_enabled && self.supported_currencies.iter().any(|c| c == code)
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_quantity == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(multi: bool, supported: &[&str]) -> TicketOffer {
        TicketOffer {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "General Admission".to_string(),
            unit_price: Money::new(490_000, "INR"),
            available_quantity: 50,
            total_quantity: 100,
            multi_currency_enabled: multi,
            supported_currencies: supported.iter().map(|s| s.to_string()).collect(),
            source: OfferSource::Backend,
        }
    }

    #[test]
    fn test_accepts_currency_requires_opt_in() {
        assert!(!offer(false, &["INR", "USD"]).accepts_currency("USD"));
        assert!(offer(true, &["INR", "USD"]).accepts_currency("USD"));
        assert!(!offer(true, &["INR"]).accepts_currency("USD"));
    }
}
