use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stagepass_currency::Money;
use uuid::Uuid;

/// Booking lifecycle status as the backend reports it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Refunded,
    OnHold,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Refunded => "REFUNDED",
            BookingStatus::OnHold => "ON_HOLD",
        }
    }
}

/// A booking record. Lifecycle is owned entirely by the backend; the
/// client only reads it and projects the status for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub status: BookingStatus,
    pub quantity: u32,
    pub total: Money,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}
