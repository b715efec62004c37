use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Countdown state. `Expired` is terminal; the timer is never re-armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockTimerState {
    Active { remaining: u64 },
    Expired,
}

/// Client-side countdown mirroring the backend seat hold. A pure reducer
/// over ticks produced elsewhere, so tests drive it without wall-clock
/// waiting. Expiry here is a local guard only; the backend corroborates at
/// booking-confirmation time.
#[derive(Debug, Clone)]
pub struct SeatLockTimer {
    state: LockTimerState,
    critical_threshold: u64,
}

impl SeatLockTimer {
    pub fn new(ttl_seconds: u64, critical_threshold: u64) -> Self {
        let state = if ttl_seconds == 0 {
            LockTimerState::Expired
        } else {
            LockTimerState::Active {
                remaining: ttl_seconds,
            }
        };
        Self {
            state,
            critical_threshold,
        }
    }

    /// Consume one tick: remaining drops by a second, hitting zero moves
    /// to `Expired` once and for all.
    pub fn tick(&mut self) {
        if let LockTimerState::Active { remaining } = self.state {
            self.state = if remaining <= 1 {
                LockTimerState::Expired
            } else {
                LockTimerState::Active {
                    remaining: remaining - 1,
                }
            };
        }
    }

    pub fn state(&self) -> LockTimerState {
        self.state
    }

    pub fn remaining_seconds(&self) -> u64 {
        match self.state {
            LockTimerState::Active { remaining } => remaining,
            LockTimerState::Expired => 0,
        }
    }

    /// Remaining time as `M:SS` for the countdown display
    pub fn display(&self) -> String {
        let remaining = self.remaining_seconds();
        format!("{}:{:02}", remaining / 60, remaining % 60)
    }

    /// Presentation urgency only; never gates logic
    pub fn is_critical(&self) -> bool {
        self.remaining_seconds() <= self.critical_threshold
    }

    pub fn is_expired(&self) -> bool {
        self.state == LockTimerState::Expired
    }
}

/// Produces one tick per period onto a channel from a background task.
/// The task is the one resource a flow must scope: it starts on mount and
/// is aborted when the handle drops or the flow hits a terminal step.
pub struct TickScheduler {
    handle: JoinHandle<()>,
}

impl TickScheduler {
    pub fn start(period: Duration) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval fires immediately; the first tick is not a second elapsed
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        (Self { handle }, rx)
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
