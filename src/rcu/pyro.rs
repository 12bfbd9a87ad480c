use super::capability::{Lifecycle, RcuCapability};
use super::config::RcuRole;
use super::shared_state::ControlSnapshot;
use crate::common::can_bus::id::RcuId;
use crate::common::can_bus::message::send_message;
use crate::common::can_bus::messages::{HealthState, PyroControlMessage, PyroStatusMessage};
use crate::common::debug2defmt_wrapper::Debug2DefmtWrapper;
use crate::common::wrapping_millis::WrappingMillis;
use crate::driver::adc::{RawCounts, ADC};
use crate::driver::can_bus::CanBusTX;
use crate::driver::pyro::{Continuity, PyroCtrl};

/// Continuity sense and firing output of one channel.
pub struct PyroChannel<C: Continuity, F: PyroCtrl> {
    name: &'static str,
    continuity: C,
    ctrl: F,
    continuity_reading: bool,
}

impl<C: Continuity, F: PyroCtrl> PyroChannel<C, F> {
    pub fn new(name: &'static str, continuity: C, ctrl: F) -> Self {
        Self {
            name,
            continuity,
            ctrl,
            continuity_reading: false,
        }
    }

    async fn set_fire(&mut self, fire: bool) -> bool {
        match self.ctrl.set_enable(fire).await {
            Ok(()) => true,
            Err(e) => {
                log_error!(
                    "Failed to drive {} output: {:?}",
                    self.name,
                    Debug2DefmtWrapper(e)
                );
                false
            }
        }
    }

    /// Reads continuity, keeping the previous reading on failure.
    async fn sample_continuity(&mut self) -> bool {
        match self.continuity.read_continuity().await {
            Ok(continuity) => {
                self.continuity_reading = continuity;
                true
            }
            Err(e) => {
                log_warn!(
                    "Failed to read {} continuity: {:?}",
                    self.name,
                    Debug2DefmtWrapper(e)
                );
                false
            }
        }
    }
}

/// The three pyro channels and the pyro battery monitor.
///
/// While the peer is connected each firing output mirrors the last received
/// control message. While disconnected every output is held inactive, even if
/// the last control message asked to fire.
// TODO: fire from a peer supplied countdown when the link drops after launch
pub struct PyroSubsystem<IC, IF, DC, DF, MC, MF, B>
where
    IC: Continuity,
    IF: PyroCtrl,
    DC: Continuity,
    DF: PyroCtrl,
    MC: Continuity,
    MF: PyroCtrl,
    B: ADC<RawCounts>,
{
    igniter: PyroChannel<IC, IF>,
    drogue: PyroChannel<DC, DF>,
    main: PyroChannel<MC, MF>,
    battery: B,
    battery_raw: u16,
    outputs: PyroControlMessage,
    outputs_ok: bool,
    inputs_ok: bool,
}

impl<IC, IF, DC, DF, MC, MF, B> PyroSubsystem<IC, IF, DC, DF, MC, MF, B>
where
    IC: Continuity,
    IF: PyroCtrl,
    DC: Continuity,
    DF: PyroCtrl,
    MC: Continuity,
    MF: PyroCtrl,
    B: ADC<RawCounts>,
{
    pub fn new(
        igniter: PyroChannel<IC, IF>,
        drogue: PyroChannel<DC, DF>,
        main: PyroChannel<MC, MF>,
        battery: B,
    ) -> Self {
        Self {
            igniter,
            drogue,
            main,
            battery,
            battery_raw: 0,
            outputs: PyroControlMessage::new(),
            outputs_ok: true,
            inputs_ok: true,
        }
    }

    /// Output levels commanded on the last refresh.
    pub fn outputs(&self) -> PyroControlMessage {
        self.outputs
    }

    async fn drive(&mut self, outputs: PyroControlMessage) {
        if outputs != self.outputs {
            log_info!(
                "Pyro outputs: igniter={} drogue={} main={}",
                outputs.fire_igniter,
                outputs.fire_drogue,
                outputs.fire_main
            );
        }
        let mut ok = self.igniter.set_fire(outputs.fire_igniter).await;
        ok &= self.drogue.set_fire(outputs.fire_drogue).await;
        ok &= self.main.set_fire(outputs.fire_main).await;
        self.outputs = outputs;
        self.outputs_ok = ok;
    }
}

impl<IC, IF, DC, DF, MC, MF, B> RcuCapability for PyroSubsystem<IC, IF, DC, DF, MC, MF, B>
where
    IC: Continuity,
    IF: PyroCtrl,
    DC: Continuity,
    DF: PyroCtrl,
    MC: Continuity,
    MF: PyroCtrl,
    B: ADC<RawCounts>,
{
    const ROLE: RcuRole = RcuRole::PyroRcu;
    const REFRESH_ON_CONTROL: bool = true;

    async fn refresh_outputs(&mut self, controls: &ControlSnapshot, connected: bool) {
        let outputs = if connected {
            controls.pyro
        } else {
            PyroControlMessage::new()
        };
        self.drive(outputs).await;
    }

    async fn on_status_tick<T: CanBusTX>(
        &mut self,
        _now: WrappingMillis,
        _controls: &ControlSnapshot,
        can_tx: &mut T,
        sender: RcuId,
    ) -> Lifecycle {
        let mut ok = self.igniter.sample_continuity().await;
        ok &= self.drogue.sample_continuity().await;
        ok &= self.main.sample_continuity().await;
        match self.battery.read().await {
            Ok(raw) => self.battery_raw = raw,
            Err(e) => {
                log_warn!("Failed to read pyro battery: {:?}", Debug2DefmtWrapper(e));
                ok = false;
            }
        }
        self.inputs_ok = ok;

        let status = PyroStatusMessage {
            igniter_continuity: self.igniter.continuity_reading,
            drogue_continuity: self.drogue.continuity_reading,
            main_continuity: self.main.continuity_reading,
            pyro_battery_voltage_raw: self.battery_raw,
        };
        if let Err(e) = send_message(can_tx, sender, &status).await {
            log_warn!("Failed to send pyro status: {:?}", Debug2DefmtWrapper(e));
        }
        Lifecycle::Running
    }

    async fn force_safe(&mut self) {
        self.drive(PyroControlMessage::new()).await;
    }

    fn health(&self) -> HealthState {
        if self.outputs_ok && self.inputs_ok {
            HealthState::Nominal
        } else {
            HealthState::Degraded
        }
    }
}
