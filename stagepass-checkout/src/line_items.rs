use stagepass_core::CheckoutItem;
use stagepass_currency::CurrencyConversionEngine;
use stagepass_domain::TicketOffer;

/// The currency this offer will actually be charged in. The viewer's
/// preference wins only when the offer is opted into multi-currency AND
/// lists that currency; otherwise the offer's base currency, always.
pub fn select_checkout_currency<'a>(offer: &'a TicketOffer, preferred: &'a str) -> &'a str {
    if offer.accepts_currency(preferred) {
        preferred
    } else {
        if preferred != offer.base_currency() {
            tracing::debug!(
                offer = %offer.id,
                preferred,
                base = offer.base_currency(),
                "offer not opted into preferred currency, charging in base"
            );
        }
        offer.base_currency()
    }
}

/// Build the line items for a checkout session from the live quantity and
/// currency selection. The unit price is converted once, at this boundary,
/// and rounded to whole minor units for the wire; the quantity is carried
/// separately, never pre-multiplied into the price.
pub fn build_line_items(
    engine: &CurrencyConversionEngine,
    offer: &TicketOffer,
    quantity: u32,
    preferred: &str,
) -> Vec<CheckoutItem> {
    let currency = select_checkout_currency(offer, preferred);
    let unit_price = engine.convert(&offer.unit_price, currency).round() as i64;

    vec![CheckoutItem {
        product_name: offer.name.clone(),
        product_description: format!("Ticket for event {}", offer.event_id),
        currency: currency.to_string(),
        quantity,
        unit_price_minor_units: unit_price,
    }]
}
