use crate::CheckoutError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One checkout line item as the backend's session API expects it.
/// Quantity stays separate from the unit price; the gateway multiplies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutItem {
    pub product_name: String,
    pub product_description: String,
    pub currency: String,
    pub quantity: u32,
    pub unit_price_minor_units: i64,
}

/// Session status as the backend reports it after consulting the gateway.
/// Externally tagged: `{"completed": {...}}` or `{"failed": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatusPayload {
    Completed {
        user_principal: Option<String>,
        response: serde_json::Value,
    },
    Failed {
        error: String,
    },
}

/// The backend actor behind the client. One call is one request/response;
/// retry and poll cadence are the caller's business.
#[async_trait]
pub trait TicketingBackend: Send + Sync {
    /// Acquire the authoritative hold on one unit of an offer. The
    /// client-side countdown only mirrors this hold's TTL.
    async fn lock_seat(
        &self,
        offer_id: Uuid,
        seat_selector: Option<&str>,
    ) -> Result<Uuid, CheckoutError>;

    /// Ask the gateway for a checkout session. Returns the raw payload;
    /// the orchestrator parses it defensively (envelope or bare URL).
    async fn create_checkout_session(
        &self,
        items: &[CheckoutItem],
        success_url: &str,
        cancel_url: &str,
    ) -> Result<serde_json::Value, CheckoutError>;

    /// One status query. `None` means the backend has not yet observed a
    /// gateway outcome for this session.
    async fn get_session_status(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionStatusPayload>, CheckoutError>;

    async fn create_booking(
        &self,
        offer_id: Uuid,
        lock_id: Uuid,
        quantity: u32,
        currency: &str,
    ) -> Result<Uuid, CheckoutError>;

    async fn confirm_booking(&self, booking_id: Uuid, session_id: &str)
        -> Result<(), CheckoutError>;

    async fn cancel_booking(&self, booking_id: Uuid) -> Result<(), CheckoutError>;
}
