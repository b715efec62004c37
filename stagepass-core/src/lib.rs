pub mod clock;
pub mod config;
pub mod gateway;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use gateway::{CheckoutItem, SessionStatusPayload, TicketingBackend};

/// Failures of the reservation-to-payment pipeline. Unsupported display
/// currencies are deliberately absent: they downgrade silently to the
/// offer's base currency and are never surfaced as errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// Client-side hold TTL elapsed; checked before any attempt to spend
    /// the lock. The caller returns the user to ticket selection.
    #[error("Seat lock expired")]
    LockExpired,

    /// The session-creation response yielded no usable redirect URL
    #[error("Checkout session response was malformed")]
    MalformedSessionResponse,

    /// Network/backend error while creating the checkout session; the flow
    /// reverts to its pre-submission step
    #[error("Checkout session creation failed: {0}")]
    SessionCreationFailed(String),

    /// The gateway reported an explicit failure; terminal for the flow,
    /// detail is shown verbatim
    #[error("Payment failed: {0}")]
    SessionResolutionFailed(String),

    /// Transport-level failure talking to the backend actor
    #[error("Backend gateway error: {0}")]
    Gateway(String),
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;
