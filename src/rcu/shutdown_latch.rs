use crate::common::wrapping_millis::WrappingMillis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShutdownLatchState {
    Idle,
    PendingSince(WrappingMillis),
    /// Terminal. Only a hardware reset leaves this state.
    Committed,
}

/// Debounces the shutdown request: power is only cut after the request has
/// been seen on every sample for the whole dwell time.
#[derive(Debug, Clone)]
pub struct ShutdownLatch {
    state: ShutdownLatchState,
    dwell_ms: u16,
}

impl ShutdownLatch {
    pub const fn new(dwell_ms: u16) -> Self {
        Self {
            state: ShutdownLatchState::Idle,
            dwell_ms,
        }
    }

    /// Advances the latch with one sample of the shutdown request.
    pub fn sample(&mut self, requested: bool, now: WrappingMillis) -> ShutdownLatchState {
        self.state = match (self.state, requested) {
            (ShutdownLatchState::Committed, _) => ShutdownLatchState::Committed,
            (ShutdownLatchState::Idle, true) => ShutdownLatchState::PendingSince(now),
            (ShutdownLatchState::Idle, false) => ShutdownLatchState::Idle,
            (ShutdownLatchState::PendingSince(since), true) => {
                if now.has_elapsed(since, self.dwell_ms) {
                    ShutdownLatchState::Committed
                } else {
                    ShutdownLatchState::PendingSince(since)
                }
            }
            (ShutdownLatchState::PendingSince(_), false) => ShutdownLatchState::Idle,
        };
        self.state
    }

    pub fn state(&self) -> ShutdownLatchState {
        self.state
    }

    pub fn dwell_ms(&self) -> u16 {
        self.dwell_ms
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ShutdownLatchState::PendingSince(_))
    }

    pub fn is_committed(&self) -> bool {
        self.state == ShutdownLatchState::Committed
    }
}
