//! Projection of a raw booking status onto the five UI categories. Total:
//! anything the schema drifts into renders as pending instead of breaking.

use stagepass_domain::BookingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    Pending,
    Confirmed,
    Cancelled,
    Refunded,
    OnHold,
}

/// Fixed presentation for one status category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub category: StatusCategory,
    pub label: &'static str,
    pub icon: &'static str,
    pub style: &'static str,
}

const PENDING: StatusBadge = StatusBadge {
    category: StatusCategory::Pending,
    label: "Payment pending",
    icon: "hourglass",
    style: "badge-warning",
};
const CONFIRMED: StatusBadge = StatusBadge {
    category: StatusCategory::Confirmed,
    label: "Confirmed",
    icon: "check-circle",
    style: "badge-success",
};
const CANCELLED: StatusBadge = StatusBadge {
    category: StatusCategory::Cancelled,
    label: "Cancelled",
    icon: "x-circle",
    style: "badge-muted",
};
const REFUNDED: StatusBadge = StatusBadge {
    category: StatusCategory::Refunded,
    label: "Refunded",
    icon: "rotate-ccw",
    style: "badge-info",
};
const ON_HOLD: StatusBadge = StatusBadge {
    category: StatusCategory::OnHold,
    label: "On hold",
    icon: "pause-circle",
    style: "badge-warning",
};

/// Map a raw status value to its badge. Unrecognised input projects to
/// pending rather than failing.
pub fn project_status(raw: &str) -> StatusBadge {
    match raw.trim().to_ascii_uppercase().as_str() {
        "CONFIRMED" => CONFIRMED,
        "CANCELLED" => CANCELLED,
        "REFUNDED" => REFUNDED,
        "ON_HOLD" | "ONHOLD" => ON_HOLD,
        _ => PENDING,
    }
}

pub fn project_booking_status(status: BookingStatus) -> StatusBadge {
    project_status(status.as_str())
}

/// Only a confirmed booking may be cancelled; every UI cancel action is
/// gated on the projection, not the raw string.
pub fn can_cancel(raw: &str) -> bool {
    project_status(raw).category == StatusCategory::Confirmed
}
