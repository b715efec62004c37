use crate::timer::{SeatLockTimer, TickScheduler};
use stagepass_checkout::{
    build_cancel_url, build_line_items, build_success_url, parse_return_marker, status,
    CheckoutOrchestrator, ReturnMarker, SessionOutcome,
};
use stagepass_core::config::BusinessRules;
use stagepass_core::{AppConfig, CheckoutError, Clock, SystemClock, TicketingBackend};
use stagepass_currency::{
    CurrencyConversionEngine, CurrencyPreference, ExchangeRateTable, FilePreferenceStore,
};
use stagepass_domain::{Booking, CheckoutSession, OfferSource, SeatLock, TicketOffer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("Invalid step transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Booking is not cancellable in status {0}")]
    NotCancellable(String),
}

/// Steps of one reservation flow. `Review` and `EscrowNotice` are
/// re-enterable; `Processing` is terminal locally: once the redirect is
/// issued this flow instance never resumes, a fresh `ReturnFlow` handles
/// the post-return resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    Review,
    EscrowNotice,
    Processing,
}

impl FlowStep {
    fn name(&self) -> &'static str {
        match self {
            FlowStep::Review => "REVIEW",
            FlowStep::EscrowNotice => "ESCROW_NOTICE",
            FlowStep::Processing => "PROCESSING",
        }
    }
}

/// Shared collaborators a flow is constructed from
#[derive(Clone)]
pub struct FlowServices {
    pub backend: Arc<dyn TicketingBackend>,
    pub engine: Arc<CurrencyConversionEngine>,
    pub preference: Arc<CurrencyPreference>,
    pub clock: Arc<dyn Clock>,
    pub rules: BusinessRules,
}

impl FlowServices {
    /// Assemble the shared services from configuration: system clock,
    /// file-backed currency preference, conversion engine over the given
    /// rate table.
    pub fn from_config(
        backend: Arc<dyn TicketingBackend>,
        config: &AppConfig,
        rates: ExchangeRateTable,
    ) -> Self {
        let store = Arc::new(FilePreferenceStore::new(&config.currency.preference_path));
        Self {
            backend,
            engine: Arc::new(CurrencyConversionEngine::new(rates)),
            preference: Arc::new(CurrencyPreference::init(
                store,
                &config.currency.fallback_currency,
            )),
            clock: Arc::new(SystemClock),
            rules: config.business_rules.clone(),
        }
    }
}

/// What `submit` hands back for navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub booking_id: Uuid,
    pub redirect_url: String,
    pub session: Option<String>,
}

/// Composes the seat-lock countdown, pricing, and checkout hand-off into
/// the review -> escrow-notice -> processing flow. Owns its lock and timer
/// exclusively; nothing here is shared across concurrent flows except the
/// preference service.
pub struct ReservationFlowController {
    services: FlowServices,
    orchestrator: CheckoutOrchestrator,
    offer: TicketOffer,
    quantity: u32,
    lock: SeatLock,
    timer: SeatLockTimer,
    step: FlowStep,
    ticks: Option<TickScheduler>,
}

impl ReservationFlowController {
    /// Start a flow for an offer: acquire the backend hold (seeded sample
    /// offers get a local-only lock and never touch the backend) and arm
    /// the countdown. The offer's source is resolved here, once.
    pub async fn begin(services: FlowServices, offer: TicketOffer) -> Result<Self, FlowError> {
        let lock_id = match offer.source {
            OfferSource::Backend => services.backend.lock_seat(offer.id, None).await?,
            OfferSource::Seeded => Uuid::new_v4(),
        };
        let lock = SeatLock::new(
            lock_id,
            offer.id,
            services.clock.now(),
            services.rules.seat_lock_seconds,
        );
        let timer = SeatLockTimer::new(
            services.rules.seat_lock_seconds,
            services.rules.critical_threshold_seconds,
        );
        info!(offer = %offer.id, lock = %lock.id, "reservation flow started");
        Ok(Self {
            orchestrator: CheckoutOrchestrator::new(services.backend.clone()),
            services,
            offer,
            quantity: 1,
            lock,
            timer,
            step: FlowStep::Review,
            ticks: None,
        })
    }

    /// Acquire the recurring tick task for this flow. Dropping the
    /// controller, or reaching `Processing`, releases it.
    pub fn mount_ticks(&mut self, period: Duration) -> mpsc::Receiver<()> {
        let (scheduler, rx) = TickScheduler::start(period);
        self.ticks = Some(scheduler);
        rx
    }

    /// Consume one countdown tick
    pub fn tick(&mut self) {
        self.timer.tick();
    }

    pub fn step(&self) -> &FlowStep {
        &self.step
    }

    pub fn lock(&self) -> &SeatLock {
        &self.lock
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Revise the quantity while the hold is alive, clamped to what the
    /// offer has available
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.clamp(1, self.offer.available_quantity.max(1));
    }

    pub fn countdown(&self) -> String {
        self.timer.display()
    }

    pub fn is_critical(&self) -> bool {
        self.timer.is_critical()
    }

    pub fn is_expired(&self) -> bool {
        self.timer.is_expired()
    }

    /// Total for the current quantity in the viewer's preferred currency,
    /// recomputed from the offer's base price on every call so no screen
    /// ever shows a stale amount
    pub fn display_total(&self) -> String {
        let total = self.offer.unit_price.scaled(self.quantity);
        self.services
            .engine
            .display(&total, &self.services.preference.get())
    }

    /// Review -> EscrowNotice
    pub fn advance(&mut self) -> Result<(), FlowError> {
        match self.step {
            FlowStep::Review => {
                self.step = FlowStep::EscrowNotice;
                Ok(())
            }
            ref other => Err(FlowError::InvalidTransition {
                from: other.name().to_string(),
                to: FlowStep::EscrowNotice.name().to_string(),
            }),
        }
    }

    /// EscrowNotice -> Review (user stepped back)
    pub fn step_back(&mut self) -> Result<(), FlowError> {
        match self.step {
            FlowStep::EscrowNotice => {
                self.step = FlowStep::Review;
                Ok(())
            }
            ref other => Err(FlowError::InvalidTransition {
                from: other.name().to_string(),
                to: FlowStep::Review.name().to_string(),
            }),
        }
    }

    /// Spend the lock: build line items from the live quantity/currency
    /// selection, create the booking and the checkout session, and move to
    /// `Processing` with the gateway redirect target.
    ///
    /// An expired countdown refuses with `LockExpired` and sends the flow
    /// back to `Review` (ticket selection). A failed session creation
    /// leaves the flow at `EscrowNotice` and surfaces the failure; nothing
    /// is retried silently.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, FlowError> {
        if self.step != FlowStep::EscrowNotice {
            return Err(FlowError::InvalidTransition {
                from: self.step.name().to_string(),
                to: FlowStep::Processing.name().to_string(),
            });
        }
        if self.timer.is_expired() {
            warn!(lock = %self.lock.id, "refusing checkout on expired seat lock");
            self.step = FlowStep::Review;
            return Err(CheckoutError::LockExpired.into());
        }

        let preferred = self.services.preference.get();
        let items = build_line_items(
            &self.services.engine,
            &self.offer,
            self.quantity,
            &preferred,
        );
        let success_url = build_success_url(&self.services.rules.return_url_base);
        let cancel_url = build_cancel_url(&self.services.rules.return_url_base);

        let session: CheckoutSession = self
            .orchestrator
            .create_session(&items, &success_url, &cancel_url)
            .await?;

        let booking_id = match self.offer.source {
            OfferSource::Backend => {
                self.services
                    .backend
                    .create_booking(self.offer.id, self.lock.id, self.quantity, &items[0].currency)
                    .await?
            }
            OfferSource::Seeded => Uuid::new_v4(),
        };

        self.step = FlowStep::Processing;
        // Terminal transition: the countdown has nothing left to guard
        self.ticks = None;
        info!(booking = %booking_id, "redirecting to payment gateway");

        Ok(SubmitOutcome {
            booking_id,
            redirect_url: session.redirect_url,
            session: session.id,
        })
    }
}

/// Outcome of resolving a gateway return
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnOutcome {
    Confirmed { principal: Option<String> },
    Failed { error: String },
    StillPending,
    Cancelled,
}

/// The fresh flow instance created after the gateway bounces the user
/// back. The original controller is gone with its page; this one only
/// resolves the session named in the return URL.
pub struct ReturnFlow {
    backend: Arc<dyn TicketingBackend>,
    orchestrator: CheckoutOrchestrator,
}

impl ReturnFlow {
    pub fn new(backend: Arc<dyn TicketingBackend>) -> Self {
        Self {
            orchestrator: CheckoutOrchestrator::new(backend.clone()),
            backend,
        }
    }

    /// Resolve a return URL. `Ok(None)` means the URL carried no payment
    /// marker, a plain page load with nothing to do. A success marker without
    /// a session identifier cannot be resolved and is malformed.
    pub async fn resolve_return(&self, url: &str) -> Result<Option<ReturnOutcome>, FlowError> {
        match parse_return_marker(url) {
            ReturnMarker::None => Ok(None),
            ReturnMarker::Cancelled => {
                info!("payment cancelled at the gateway");
                Ok(Some(ReturnOutcome::Cancelled))
            }
            ReturnMarker::Success { session_id: None } => {
                Err(CheckoutError::MalformedSessionResponse.into())
            }
            ReturnMarker::Success {
                session_id: Some(id),
            } => {
                let outcome = match self.orchestrator.resolve_session(&id).await? {
                    SessionOutcome::Completed { principal } => {
                        ReturnOutcome::Confirmed { principal }
                    }
                    SessionOutcome::Failed { error } => ReturnOutcome::Failed { error },
                    SessionOutcome::Unresolved => ReturnOutcome::StillPending,
                };
                Ok(Some(outcome))
            }
        }
    }

    /// Confirm the booking once its session has completed. Re-checks the
    /// session so a stale UI cannot confirm against a failed payment; a
    /// failed session is terminal and carries the gateway detail verbatim.
    pub async fn confirm(&self, booking_id: Uuid, session_id: &str) -> Result<(), FlowError> {
        match self.orchestrator.resolve_session(session_id).await? {
            SessionOutcome::Completed { .. } => {
                self.backend.confirm_booking(booking_id, session_id).await?;
                info!(booking = %booking_id, "booking confirmed");
                Ok(())
            }
            SessionOutcome::Failed { error } => {
                Err(CheckoutError::SessionResolutionFailed(error).into())
            }
            SessionOutcome::Unresolved => Err(CheckoutError::Gateway(
                "session not yet resolved".to_string(),
            )
            .into()),
        }
    }

    /// Cancel a booking. Gated on the status projection: only a booking
    /// that projects as confirmed may be cancelled.
    pub async fn cancel(&self, booking: &Booking) -> Result<(), FlowError> {
        let raw = booking.status.as_str();
        if !status::can_cancel(raw) {
            return Err(FlowError::NotCancellable(raw.to_string()));
        }
        self.backend.cancel_booking(booking.id).await?;
        info!(booking = %booking.id, "booking cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagepass_checkout::MockTicketingBackend;
    use stagepass_core::{ManualClock, SessionStatusPayload};
    use stagepass_currency::{
        CurrencyPreference, ExchangeRateTable, MemoryPreferenceStore, Money, PreferenceStore,
    };
    use stagepass_domain::BookingStatus;

    fn services(backend: Arc<MockTicketingBackend>) -> FlowServices {
        let store = Arc::new(MemoryPreferenceStore::default());
        store.save("INR");
        FlowServices {
            backend,
            engine: Arc::new(CurrencyConversionEngine::new(
                ExchangeRateTable::new("INR").with_rate("USD", 0.012),
            )),
            preference: Arc::new(CurrencyPreference::init(store, "INR")),
            clock: Arc::new(ManualClock::new(chrono::Utc::now())),
            rules: BusinessRules::default(),
        }
    }

    fn offer() -> TicketOffer {
        TicketOffer {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "Front Row".to_string(),
            unit_price: Money::new(490_000, "INR"),
            available_quantity: 4,
            total_quantity: 100,
            multi_currency_enabled: false,
            supported_currencies: vec!["INR".to_string()],
            source: OfferSource::Backend,
        }
    }

    #[tokio::test]
    async fn test_begin_acquires_backend_hold() {
        let backend = Arc::new(MockTicketingBackend::new());
        let flow = ReservationFlowController::begin(services(backend.clone()), offer())
            .await
            .unwrap();
        assert_eq!(backend.call_count("lock_seat"), 1);
        assert_eq!(*flow.step(), FlowStep::Review);
        assert_eq!(flow.countdown(), "2:00");
    }

    #[tokio::test]
    async fn test_seeded_offer_never_calls_backend() {
        let backend = Arc::new(MockTicketingBackend::new());
        let mut sample = offer();
        sample.source = OfferSource::Seeded;
        let mut flow = ReservationFlowController::begin(services(backend.clone()), sample)
            .await
            .unwrap();
        flow.advance().unwrap();
        flow.submit().await.unwrap();
        assert_eq!(backend.call_count("lock_seat"), 0);
        assert_eq!(backend.call_count("create_booking"), 0);
        // The session itself still goes through the gateway
        assert_eq!(backend.call_count("create_checkout_session"), 1);
    }

    #[tokio::test]
    async fn test_expired_lock_refuses_and_never_creates_session() {
        let backend = Arc::new(MockTicketingBackend::new());
        let mut flow = ReservationFlowController::begin(services(backend.clone()), offer())
            .await
            .unwrap();
        flow.advance().unwrap();
        for _ in 0..120 {
            flow.tick();
        }
        assert!(flow.is_expired());

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Checkout(CheckoutError::LockExpired)
        ));
        // Back to ticket selection, and no gateway request was issued
        assert_eq!(*flow.step(), FlowStep::Review);
        assert_eq!(backend.call_count("create_checkout_session"), 0);
    }

    #[tokio::test]
    async fn test_submit_uses_live_quantity() {
        let backend = Arc::new(MockTicketingBackend::new());
        let mut flow = ReservationFlowController::begin(services(backend.clone()), offer())
            .await
            .unwrap();
        flow.set_quantity(3);
        flow.advance().unwrap();
        let outcome = flow.submit().await.unwrap();

        assert_eq!(*flow.step(), FlowStep::Processing);
        assert_eq!(outcome.redirect_url, "https://pay.example/cs_mock_1");
        let items = backend.last_items.lock().unwrap();
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].currency, "INR");
        assert_eq!(items[0].unit_price_minor_units, 490_000);
    }

    #[tokio::test]
    async fn test_session_creation_failure_reverts_to_escrow_notice() {
        let backend = Arc::new(MockTicketingBackend::new().failing_session_creation());
        let mut flow = ReservationFlowController::begin(services(backend.clone()), offer())
            .await
            .unwrap();
        flow.advance().unwrap();

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Checkout(CheckoutError::SessionCreationFailed(_))
        ));
        assert_eq!(*flow.step(), FlowStep::EscrowNotice);
        assert_eq!(backend.call_count("create_booking"), 0);
    }

    #[tokio::test]
    async fn test_quantity_clamped_to_availability() {
        let backend = Arc::new(MockTicketingBackend::new());
        let mut flow = ReservationFlowController::begin(services(backend), offer())
            .await
            .unwrap();
        flow.set_quantity(99);
        assert_eq!(flow.quantity(), 4);
        flow.set_quantity(0);
        assert_eq!(flow.quantity(), 1);
    }

    #[tokio::test]
    async fn test_step_machine_re_entry() {
        let backend = Arc::new(MockTicketingBackend::new());
        let mut flow = ReservationFlowController::begin(services(backend), offer())
            .await
            .unwrap();
        flow.advance().unwrap();
        flow.step_back().unwrap();
        assert_eq!(*flow.step(), FlowStep::Review);
        assert!(flow.step_back().is_err());
        assert!(matches!(
            flow.submit().await.unwrap_err(),
            FlowError::InvalidTransition { .. }
        ));
    }

    #[tokio::test]
    async fn test_display_total_tracks_quantity() {
        let backend = Arc::new(MockTicketingBackend::new());
        let mut flow = ReservationFlowController::begin(services(backend), offer())
            .await
            .unwrap();
        assert_eq!(flow.display_total(), "₹4,900.00");
        flow.set_quantity(2);
        assert_eq!(flow.display_total(), "₹9,800.00");
    }

    #[tokio::test]
    async fn test_return_flow_outcomes() {
        let backend = Arc::new(MockTicketingBackend::new());
        let flow = ReturnFlow::new(backend.clone());

        // Plain page load: nothing to resolve
        assert_eq!(
            flow.resolve_return("https://app/return").await.unwrap(),
            None
        );

        // Backend has not observed the gateway yet
        assert_eq!(
            flow.resolve_return("https://app/return?payment=success&session_id=cs_9")
                .await
                .unwrap(),
            Some(ReturnOutcome::StillPending)
        );

        *backend.session_status.lock().unwrap() = Some(SessionStatusPayload::Failed {
            error: "card_declined".to_string(),
        });
        assert_eq!(
            flow.resolve_return("https://app/return?payment=success&session_id=cs_9")
                .await
                .unwrap(),
            Some(ReturnOutcome::Failed {
                error: "card_declined".to_string()
            })
        );

        assert_eq!(
            flow.resolve_return("https://app/return?payment=cancelled")
                .await
                .unwrap(),
            Some(ReturnOutcome::Cancelled)
        );
    }

    #[tokio::test]
    async fn test_confirm_refuses_failed_session() {
        let backend = Arc::new(MockTicketingBackend::new().with_session_status(
            SessionStatusPayload::Failed {
                error: "card_declined".to_string(),
            },
        ));
        let flow = ReturnFlow::new(backend.clone());

        let err = flow.confirm(Uuid::new_v4(), "cs_9").await.unwrap_err();
        match err {
            FlowError::Checkout(CheckoutError::SessionResolutionFailed(detail)) => {
                assert_eq!(detail, "card_declined");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(backend.call_count("confirm_booking"), 0);
    }

    #[tokio::test]
    async fn test_cancel_gated_on_projection() {
        let backend = Arc::new(MockTicketingBackend::new());
        let flow = ReturnFlow::new(backend.clone());

        let mut booking = Booking {
            id: Uuid::new_v4(),
            offer_id: Uuid::new_v4(),
            status: BookingStatus::Pending,
            quantity: 1,
            total: Money::new(490_000, "INR"),
            session_id: Some("cs_9".to_string()),
            created_at: chrono::Utc::now(),
            confirmed_at: None,
            cancelled_at: None,
        };

        let err = flow.cancel(&booking).await.unwrap_err();
        assert!(matches!(err, FlowError::NotCancellable(_)));
        assert_eq!(backend.call_count("cancel_booking"), 0);

        booking.status = BookingStatus::Confirmed;
        flow.cancel(&booking).await.unwrap();
        assert_eq!(backend.call_count("cancel_booking"), 1);
    }
}
