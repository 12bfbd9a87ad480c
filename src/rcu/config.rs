use crate::common::can_bus::id::RcuId;

/// Which physical functions a node owns. Fixed per board at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RcuRole {
    PowerRcu,
    PyroRcu,
    /// One board doing both jobs.
    PowerPyroRcu,
}

impl RcuRole {
    pub const fn has_power(self) -> bool {
        matches!(self, RcuRole::PowerRcu | RcuRole::PowerPyroRcu)
    }

    pub const fn has_pyro(self) -> bool {
        matches!(self, RcuRole::PyroRcu | RcuRole::PowerPyroRcu)
    }

    pub const fn local_id(self) -> RcuId {
        match self {
            RcuRole::PowerRcu => RcuId::Power,
            RcuRole::PyroRcu => RcuId::Pyro,
            RcuRole::PowerPyroRcu => RcuId::PowerPyro,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerThresholds {
    pub overcurrent_12v_ma: u16,
    pub overcurrent_5v_ma: u16,
    pub overvoltage_mv: u16,
    pub undervoltage_mv: u16,
}

impl PowerThresholds {
    pub const fn new() -> Self {
        Self {
            overcurrent_12v_ma: 15000,
            overcurrent_5v_ma: 5000,
            overvoltage_mv: 14000,
            undervoltage_mv: 11000,
        }
    }
}

impl Default for PowerThresholds {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    ZeroPeriod,
    /// An interval the node measures would not fit in half a counter wrap.
    IntervalTooLong { interval_ms: u32 },
}

/// Longest interval that wrapping 16-bit subtraction can measure with margin.
pub const MAX_MEASURED_INTERVAL_MS: u32 = (u16::MAX as u32 + 1) / 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RcuConfig {
    /// Outputs and connection indicator, 200 Hz.
    pub output_refresh_period_ms: u16,
    /// Status messages, shutdown latch and heartbeat timeout, 10 Hz.
    pub status_period_ms: u16,
    /// Heartbeat broadcast and power indicator, 2 Hz.
    pub heartbeat_period_ms: u16,
    pub heartbeat_timeout_ms: u16,
    /// How long the connection indicator stays lit after a heartbeat.
    pub heartbeat_blink_ms: u16,
    pub shutdown_dwell_ms: u16,
    /// Node whose heartbeats and control messages are accepted.
    pub peer: RcuId,
    pub power_thresholds: PowerThresholds,
}

impl RcuConfig {
    pub const fn new() -> Self {
        Self {
            output_refresh_period_ms: 5,
            status_period_ms: 100,
            heartbeat_period_ms: 500,
            heartbeat_timeout_ms: 1000,
            heartbeat_blink_ms: 100,
            shutdown_dwell_ms: 20000,
            peer: RcuId::Main,
            power_thresholds: PowerThresholds::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_refresh_period_ms == 0
            || self.status_period_ms == 0
            || self.heartbeat_period_ms == 0
            || self.heartbeat_timeout_ms == 0
            || self.shutdown_dwell_ms == 0
        {
            return Err(ConfigError::ZeroPeriod);
        }

        // timeouts are only checked on the status tick, so they can overshoot by one period
        let status_period = self.status_period_ms as u32;
        for interval_ms in [
            self.heartbeat_timeout_ms as u32 + status_period,
            self.shutdown_dwell_ms as u32 + status_period,
            self.heartbeat_period_ms as u32,
        ] {
            if interval_ms >= MAX_MEASURED_INTERVAL_MS {
                return Err(ConfigError::IntervalTooLong { interval_ms });
            }
        }
        Ok(())
    }
}

impl Default for RcuConfig {
    fn default() -> Self {
        Self::new()
    }
}
