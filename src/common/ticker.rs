use super::wrapping_millis::WrappingMillis;

/// Poll-based fixed-rate ticker for a cooperative main loop.
///
/// `poll` returns `true` at most once per `period_ms`, measured from the last
/// time it fired. Missed periods are not caught up.
#[derive(Debug, Clone)]
pub struct Ticker {
    pub period_ms: u16,
    last_fired: WrappingMillis,
}

impl Ticker {
    pub const fn every(period_ms: u16, start: WrappingMillis) -> Self {
        Self {
            period_ms,
            last_fired: start,
        }
    }

    pub fn poll(&mut self, now: WrappingMillis) -> bool {
        if now.has_elapsed(self.last_fired, self.period_ms) {
            self.last_fired = now;
            true
        } else {
            false
        }
    }
}
