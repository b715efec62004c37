use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A time-bounded exclusive claim on one unit of inventory, mirroring the
/// backend-side hold. Never re-armed; it is logically destroyed on expiry,
/// explicit cancellation, or confirmed booking. The backend remains
/// authoritative at confirmation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatLock {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub ttl_seconds: u64,
}

impl SeatLock {
    pub fn new(id: Uuid, offer_id: Uuid, created_at: DateTime<Utc>, ttl_seconds: u64) -> Self {
        Self {
            id,
            offer_id,
            created_at,
            ttl_seconds,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(self.ttl_seconds as i64)
    }
}
