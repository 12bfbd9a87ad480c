use super::config::RcuConfig;
use crate::common::ticker::Ticker;
use crate::common::wrapping_millis::WrappingMillis;

/// Which periodic task bodies should run in this loop iteration.
///
/// The node runs them in field order: output refresh, status, heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DueTasks {
    pub output_refresh: bool,
    pub status: bool,
    pub heartbeat: bool,
}

#[derive(Debug, Clone)]
pub struct RcuScheduler {
    output_refresh: Ticker,
    status: Ticker,
    heartbeat: Ticker,
}

impl RcuScheduler {
    pub fn new(config: &RcuConfig, start: WrappingMillis) -> Self {
        Self {
            output_refresh: Ticker::every(config.output_refresh_period_ms, start),
            status: Ticker::every(config.status_period_ms, start),
            heartbeat: Ticker::every(config.heartbeat_period_ms, start),
        }
    }

    pub fn poll(&mut self, now: WrappingMillis) -> DueTasks {
        DueTasks {
            output_refresh: self.output_refresh.poll(now),
            status: self.status.poll(now),
            heartbeat: self.heartbeat.poll(now),
        }
    }
}
