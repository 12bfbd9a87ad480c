use embassy_sync::blocking_mutex::raw::RawMutex;

use super::capability::{Lifecycle, RcuCapability};
use super::config::{ConfigError, RcuConfig, RcuRole};
use super::connection::{ConnectionMonitor, ConnectionState};
use super::dispatcher::MessageDispatcher;
use super::scheduler::RcuScheduler;
use super::shared_state::RcuSharedState;
use crate::common::can_bus::message::send_message;
use crate::common::can_bus::messages::HeartbeatMessage;
use crate::common::debug2defmt_wrapper::Debug2DefmtWrapper;
use crate::common::wrapping_millis::WrappingMillis;
use crate::driver::can_bus::CanBusTX;
use crate::driver::clock::Clock;
use crate::driver::indicator::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeState {
    Running,
    /// Shutdown committed. Outputs are off and nothing runs until reset.
    Halted,
}

/// One RCU: the cooperative main loop shared by every role.
///
/// Call [`step`](Self::step) repeatedly from the main loop. Frames received
/// from the bus go through [`dispatcher`](Self::dispatcher) into the shared
/// state, which may happen concurrently from interrupt context.
pub struct RcuNode<'a, M, C, TX, CI, R>
where
    M: RawMutex,
    C: Clock,
    TX: CanBusTX,
    CI: Indicator,
    R: RcuCapability,
{
    config: RcuConfig,
    shared: &'a RcuSharedState<M>,
    clock: C,
    can_tx: TX,
    connection_indicator: CI,
    scheduler: RcuScheduler,
    connection: ConnectionMonitor,
    subsystem: R,
    state: NodeState,
}

impl<'a, M, C, TX, CI, R> RcuNode<'a, M, C, TX, CI, R>
where
    M: RawMutex,
    C: Clock,
    TX: CanBusTX,
    CI: Indicator,
    R: RcuCapability,
{
    /// Fails if `config` does not pass [`RcuConfig::validate`].
    pub fn new(
        config: RcuConfig,
        shared: &'a RcuSharedState<M>,
        clock: C,
        can_tx: TX,
        connection_indicator: CI,
        subsystem: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = clock.now_ms();
        log_info!(
            "Initializing {:?} as RCU id {}",
            R::ROLE,
            R::ROLE.local_id() as u8
        );
        Ok(Self {
            scheduler: RcuScheduler::new(&config, start),
            connection: ConnectionMonitor::new(config.heartbeat_timeout_ms),
            config,
            shared,
            clock,
            can_tx,
            connection_indicator,
            subsystem,
            state: NodeState::Running,
        })
    }

    pub fn role(&self) -> RcuRole {
        R::ROLE
    }

    /// The receive-side half of this node, to be fed every inbound frame.
    pub fn dispatcher(&self) -> MessageDispatcher {
        MessageDispatcher::new(R::ROLE, self.config.peer)
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn subsystem(&self) -> &R {
        &self.subsystem
    }

    /// Runs one main loop iteration. Never blocks on the bus.
    pub async fn step(&mut self) -> NodeState {
        if self.state == NodeState::Halted {
            return NodeState::Halted;
        }

        let now = self.clock.now_ms();

        if self.shared.take_heartbeat_received() && self.connection.on_heartbeat(now) {
            log_info!("Heartbeat received, connected to {:?}", self.config.peer);
        }

        let due = self.scheduler.poll(now);
        let power_control_edge = self.shared.take_power_control_received();
        let pyro_control_edge = self.shared.take_pyro_control_received();
        let control_edge = power_control_edge || pyro_control_edge;

        if due.output_refresh || (R::REFRESH_ON_CONTROL && control_edge) {
            self.refresh_outputs(now).await;
        }

        if due.status {
            if self.connection.check_timeout(now) {
                log_warn!(
                    "No heartbeat for {}ms, disconnected",
                    self.config.heartbeat_timeout_ms
                );
                self.refresh_outputs(now).await;
            }

            let controls = self.shared.control_snapshot();
            let lifecycle = self
                .subsystem
                .on_status_tick(now, &controls, &mut self.can_tx, R::ROLE.local_id())
                .await;
            if lifecycle == Lifecycle::ShutdownCommitted {
                self.halt().await;
                return NodeState::Halted;
            }
        }

        if due.heartbeat {
            self.send_heartbeat().await;
            self.subsystem.on_heartbeat_tick().await;
        }

        NodeState::Running
    }

    async fn refresh_outputs(&mut self, now: WrappingMillis) {
        let controls = self.shared.control_snapshot();
        let connected = self.connection.is_connected();
        self.subsystem.refresh_outputs(&controls, connected).await;

        let blink = self
            .connection
            .since_last_heartbeat(now)
            .is_some_and(|elapsed| elapsed < self.config.heartbeat_blink_ms);
        self.connection_indicator.set_enable(blink).await;
    }

    async fn send_heartbeat(&mut self) {
        let heartbeat = HeartbeatMessage {
            health: self.subsystem.health(),
            uptime_s: self.clock.uptime_s(),
        };
        if let Err(e) = send_message(&mut self.can_tx, R::ROLE.local_id(), &heartbeat).await {
            log_warn!("Failed to send heartbeat: {:?}", Debug2DefmtWrapper(e));
        }
    }

    async fn halt(&mut self) {
        self.subsystem.force_safe().await;
        self.connection_indicator.set_enable(false).await;
        self.state = NodeState::Halted;
        log_error!("Shutdown committed, outputs off, halted until reset");
    }
}
