use super::config::RcuRole;
use super::shared_state::ControlSnapshot;
use crate::common::can_bus::id::RcuId;
use crate::common::can_bus::messages::HealthState;
use crate::common::wrapping_millis::WrappingMillis;
use crate::driver::can_bus::CanBusTX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lifecycle {
    Running,
    /// The node must force its outputs safe and stop.
    ShutdownCommitted,
}

/// Role specific behaviour plugged into the shared node loop.
///
/// The node owns scheduling, heartbeats and the connection state; a
/// subsystem owns its pins, its sensors and its status message.
#[allow(async_fn_in_trait)]
pub trait RcuCapability {
    const ROLE: RcuRole;

    /// Refresh outputs as soon as a new control message arrives instead of
    /// waiting for the next output tick.
    const REFRESH_ON_CONTROL: bool = false;

    /// Output tick, and immediately after connection loss.
    async fn refresh_outputs(&mut self, controls: &ControlSnapshot, connected: bool);

    /// Status tick: sample inputs, advance role state, transmit status.
    async fn on_status_tick<T: CanBusTX>(
        &mut self,
        now: WrappingMillis,
        controls: &ControlSnapshot,
        can_tx: &mut T,
        sender: RcuId,
    ) -> Lifecycle;

    /// Heartbeat tick.
    async fn on_heartbeat_tick(&mut self) {}

    /// Drive every output to its inactive state.
    async fn force_safe(&mut self);

    fn health(&self) -> HealthState;
}
