pub mod line_items;
pub mod orchestrator;
pub mod redirect;
pub mod status;

pub use line_items::{build_line_items, select_checkout_currency};
pub use orchestrator::{CheckoutOrchestrator, MockTicketingBackend, SessionOutcome};
pub use redirect::{build_cancel_url, build_success_url, parse_return_marker, ReturnMarker};
pub use status::{project_status, StatusBadge, StatusCategory};
