/// A reading of the free-running 16-bit millisecond counter.
///
/// The counter wraps every 65.536 s. Elapsed time is always computed with
/// fixed-width wrapping subtraction, which gives the right answer as long as
/// the two readings are less than one wrap period apart. Every interval the
/// RCU measures (at most the 20 s shutdown dwell plus one status period) is
/// well inside that window, see [`RcuConfig::validate`](crate::RcuConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WrappingMillis(pub u16);

impl WrappingMillis {
    /// Milliseconds from `earlier` to `self`, modulo 2^16.
    pub const fn elapsed_since(self, earlier: WrappingMillis) -> u16 {
        self.0.wrapping_sub(earlier.0)
    }

    pub const fn has_elapsed(self, since: WrappingMillis, duration_ms: u16) -> bool {
        self.elapsed_since(since) >= duration_ms
    }

    pub const fn wrapping_add(self, ms: u16) -> Self {
        Self(self.0.wrapping_add(ms))
    }
}

impl From<u16> for WrappingMillis {
    fn from(value: u16) -> Self {
        Self(value)
    }
}
