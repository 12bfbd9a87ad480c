use super::capability::{Lifecycle, RcuCapability};
use super::config::{PowerThresholds, RcuConfig, RcuRole};
use super::shared_state::ControlSnapshot;
use super::shutdown_latch::{ShutdownLatch, ShutdownLatchState};
use crate::common::can_bus::id::RcuId;
use crate::common::can_bus::message::send_message;
use crate::common::can_bus::messages::{HealthState, PowerStatusMessage};
use crate::common::debug2defmt_wrapper::Debug2DefmtWrapper;
use crate::common::wrapping_millis::WrappingMillis;
use crate::driver::adc::{Milliamp, Millivolt, UnitType, ADC};
use crate::driver::can_bus::CanBusTX;
use crate::driver::indicator::Indicator;
use crate::driver::power::{ExternalPowerSense, PowerSwitch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerReading {
    pub voltage_12v_mv: u16,
    pub current_12v_ma: u16,
    pub current_5v_ma: u16,
}

impl PowerThresholds {
    pub fn status(
        &self,
        reading: PowerReading,
        external_power_connected: bool,
        shutdown_pending: bool,
    ) -> PowerStatusMessage {
        PowerStatusMessage {
            voltage_12v_mv: reading.voltage_12v_mv,
            current_12v_ma: reading.current_12v_ma,
            current_5v_ma: reading.current_5v_ma,
            shutdown_pending,
            external_power_connected,
            overcurrent_12v: reading.current_12v_ma > self.overcurrent_12v_ma,
            overcurrent_5v: reading.current_5v_ma > self.overcurrent_5v_ma,
            overvoltage: reading.voltage_12v_mv > self.overvoltage_mv,
            undervoltage: reading.voltage_12v_mv < self.undervoltage_mv,
        }
    }
}

/// Reads one channel into `value`. On failure the previous value is kept.
async fn sample_into<U: UnitType>(adc: &mut impl ADC<U>, value: &mut u16, name: &str) -> bool {
    match adc.read().await {
        Ok(reading) => {
            *value = reading;
            true
        }
        Err(e) => {
            log_warn!("Failed to read {}: {:?}", name, Debug2DefmtWrapper(e));
            false
        }
    }
}

/// Power distribution: battery monitoring, the system power switch and the
/// debounced remote shutdown.
pub struct PowerSubsystem<PS, EPS, V, A12, A5, I>
where
    PS: PowerSwitch,
    EPS: ExternalPowerSense,
    V: ADC<Millivolt>,
    A12: ADC<Milliamp>,
    A5: ADC<Milliamp>,
    I: Indicator,
{
    thresholds: PowerThresholds,
    latch: ShutdownLatch,
    power_switch: PS,
    external_power_sense: EPS,
    voltage_12v: V,
    current_12v: A12,
    current_5v: A5,
    power_indicator: I,
    power_indicator_on: bool,
    reading: PowerReading,
    external_power_connected: bool,
    health: HealthState,
}

impl<PS, EPS, V, A12, A5, I> PowerSubsystem<PS, EPS, V, A12, A5, I>
where
    PS: PowerSwitch,
    EPS: ExternalPowerSense,
    V: ADC<Millivolt>,
    A12: ADC<Milliamp>,
    A5: ADC<Milliamp>,
    I: Indicator,
{
    pub fn new(
        config: &RcuConfig,
        power_switch: PS,
        external_power_sense: EPS,
        voltage_12v: V,
        current_12v: A12,
        current_5v: A5,
        power_indicator: I,
    ) -> Self {
        Self {
            thresholds: config.power_thresholds,
            latch: ShutdownLatch::new(config.shutdown_dwell_ms),
            power_switch,
            external_power_sense,
            voltage_12v,
            current_12v,
            current_5v,
            power_indicator,
            power_indicator_on: false,
            reading: PowerReading::default(),
            external_power_connected: false,
            health: HealthState::Nominal,
        }
    }

    pub fn latch_state(&self) -> ShutdownLatchState {
        self.latch.state()
    }

    fn advance_latch(&mut self, requested: bool, now: WrappingMillis) {
        let previous = self.latch.state();
        match (previous, self.latch.sample(requested, now)) {
            (ShutdownLatchState::Idle, ShutdownLatchState::PendingSince(_)) => {
                log_warn!(
                    "Shutdown requested, cutting power in {}ms unless cleared",
                    self.latch.dwell_ms()
                );
            }
            (ShutdownLatchState::PendingSince(_), ShutdownLatchState::Idle) => {
                log_info!("Shutdown request cleared");
            }
            (ShutdownLatchState::PendingSince(_), ShutdownLatchState::Committed) => {
                log_warn!("Shutdown committed");
            }
            _ => {}
        }
    }

    async fn sample_inputs(&mut self) -> bool {
        let reading = &mut self.reading;
        let mut ok =
            sample_into(&mut self.voltage_12v, &mut reading.voltage_12v_mv, "12V voltage").await;
        ok &= sample_into(&mut self.current_12v, &mut reading.current_12v_ma, "12V current").await;
        ok &= sample_into(&mut self.current_5v, &mut reading.current_5v_ma, "5V current").await;
        match self.external_power_sense.read_connected().await {
            Ok(connected) => self.external_power_connected = connected,
            Err(e) => {
                log_warn!(
                    "Failed to read external power sense: {:?}",
                    Debug2DefmtWrapper(e)
                );
                ok = false;
            }
        }
        ok
    }
}

impl<PS, EPS, V, A12, A5, I> RcuCapability for PowerSubsystem<PS, EPS, V, A12, A5, I>
where
    PS: PowerSwitch,
    EPS: ExternalPowerSense,
    V: ADC<Millivolt>,
    A12: ADC<Milliamp>,
    A5: ADC<Milliamp>,
    I: Indicator,
{
    const ROLE: RcuRole = RcuRole::PowerRcu;

    // the power switch follows the latch, which only moves on the status tick
    async fn refresh_outputs(&mut self, _controls: &ControlSnapshot, _connected: bool) {}

    async fn on_status_tick<T: CanBusTX>(
        &mut self,
        now: WrappingMillis,
        controls: &ControlSnapshot,
        can_tx: &mut T,
        sender: RcuId,
    ) -> Lifecycle {
        self.advance_latch(controls.power.shutdown_request, now);

        let mut ok = true;
        if let Err(e) = self.power_switch.set_enable(!self.latch.is_committed()).await {
            log_error!("Failed to drive power switch: {:?}", Debug2DefmtWrapper(e));
            ok = false;
        }
        ok &= self.sample_inputs().await;
        self.health = if ok {
            HealthState::Nominal
        } else {
            HealthState::Degraded
        };

        let status = self.thresholds.status(
            self.reading,
            self.external_power_connected,
            self.latch.state() != ShutdownLatchState::Idle,
        );
        if let Err(e) = send_message(can_tx, sender, &status).await {
            log_warn!("Failed to send power status: {:?}", Debug2DefmtWrapper(e));
        }

        if self.latch.is_committed() {
            Lifecycle::ShutdownCommitted
        } else {
            Lifecycle::Running
        }
    }

    async fn on_heartbeat_tick(&mut self) {
        // blink while a shutdown is pending, solid while power is on
        self.power_indicator_on = if self.latch.is_pending() {
            !self.power_indicator_on
        } else {
            true
        };
        self.power_indicator.set_enable(self.power_indicator_on).await;
    }

    async fn force_safe(&mut self) {
        if let Err(e) = self.power_switch.set_enable(false).await {
            log_error!("Failed to cut power: {:?}", Debug2DefmtWrapper(e));
        }
        self.power_indicator_on = false;
        self.power_indicator.set_enable(false).await;
    }

    fn health(&self) -> HealthState {
        self.health
    }
}
