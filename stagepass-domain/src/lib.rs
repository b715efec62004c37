pub mod booking;
pub mod lock;
pub mod offer;
pub mod session;

pub use booking::{Booking, BookingStatus};
pub use lock::SeatLock;
pub use offer::{OfferSource, TicketOffer};
pub use session::{CheckoutSession, SessionResolution};
