use super::capability::{Lifecycle, RcuCapability};
use super::config::RcuRole;
use super::shared_state::ControlSnapshot;
use crate::common::can_bus::id::RcuId;
use crate::common::can_bus::messages::HealthState;
use crate::common::wrapping_millis::WrappingMillis;
use crate::driver::can_bus::CanBusTX;

/// A single board carrying both the power and the pyro functions.
///
/// `P` is expected to be a [`PowerSubsystem`](super::power::PowerSubsystem)
/// and `Y` a [`PyroSubsystem`](super::pyro::PyroSubsystem). A committed
/// shutdown from the power side forces the pyro channels off as well.
pub struct PowerPyroSubsystem<P: RcuCapability, Y: RcuCapability> {
    pub power: P,
    pub pyro: Y,
}

impl<P: RcuCapability, Y: RcuCapability> PowerPyroSubsystem<P, Y> {
    pub fn new(power: P, pyro: Y) -> Self {
        Self { power, pyro }
    }
}

impl<P: RcuCapability, Y: RcuCapability> RcuCapability for PowerPyroSubsystem<P, Y> {
    const ROLE: RcuRole = RcuRole::PowerPyroRcu;
    const REFRESH_ON_CONTROL: bool = P::REFRESH_ON_CONTROL || Y::REFRESH_ON_CONTROL;

    async fn refresh_outputs(&mut self, controls: &ControlSnapshot, connected: bool) {
        self.power.refresh_outputs(controls, connected).await;
        self.pyro.refresh_outputs(controls, connected).await;
    }

    async fn on_status_tick<T: CanBusTX>(
        &mut self,
        now: WrappingMillis,
        controls: &ControlSnapshot,
        can_tx: &mut T,
        sender: RcuId,
    ) -> Lifecycle {
        let pyro = self.pyro.on_status_tick(now, controls, can_tx, sender).await;
        let power = self.power.on_status_tick(now, controls, can_tx, sender).await;
        if pyro == Lifecycle::ShutdownCommitted || power == Lifecycle::ShutdownCommitted {
            Lifecycle::ShutdownCommitted
        } else {
            Lifecycle::Running
        }
    }

    async fn on_heartbeat_tick(&mut self) {
        self.power.on_heartbeat_tick().await;
        self.pyro.on_heartbeat_tick().await;
    }

    async fn force_safe(&mut self) {
        self.pyro.force_safe().await;
        self.power.force_safe().await;
    }

    fn health(&self) -> HealthState {
        self.power.health().worst(self.pyro.health())
    }
}
