pub mod controller;
pub mod timer;

pub use controller::{
    FlowError, FlowServices, FlowStep, ReservationFlowController, ReturnFlow, ReturnOutcome,
    SubmitOutcome,
};
pub use timer::{LockTimerState, SeatLockTimer, TickScheduler};
