use crate::common::wrapping_millis::WrappingMillis;

/// Free-running monotonic counters maintained by the timer driver.
pub trait Clock: Clone {
    /// Millisecond counter, wraps at 2^16.
    fn now_ms(&self) -> WrappingMillis;

    /// Seconds since reset.
    fn uptime_s(&self) -> u32;
}
