use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::common::debug2defmt_wrapper::Debug2DefmtWrapper;
use crate::driver::can_bus::{CanBusRX, CanBusRawMessage as _, CanBusTX};
use crate::driver::clock::Clock;
use crate::driver::indicator::Indicator;
use crate::rcu::capability::RcuCapability;
use crate::rcu::dispatcher::MessageDispatcher;
use crate::rcu::node::{NodeState, RcuNode};
use crate::rcu::shared_state::RcuSharedState;

/// Steps the node until shutdown is committed.
///
/// Returns once the node has halted with every output off; the caller is
/// then expected to put the MCU to sleep until the reset button is pressed.
pub async fn rcu_main<M, C, TX, CI, R>(mut node: RcuNode<'_, M, C, TX, CI, R>)
where
    M: RawMutex,
    C: Clock,
    TX: CanBusTX,
    CI: Indicator,
    R: RcuCapability,
{
    log_info!("Starting {:?} main loop", node.role());
    loop {
        if node.step().await == NodeState::Halted {
            log_warn!("Main loop stopped, waiting for reset");
            return;
        }
        yield_now().await;
    }
}

/// Receive task for firmware that gets frames from an async driver rather
/// than an interrupt callback.
pub async fn rcu_can_rx_main<M: RawMutex>(
    shared: &RcuSharedState<M>,
    dispatcher: MessageDispatcher,
    mut can_rx: impl CanBusRX,
    mut delay: impl DelayNs,
) -> ! {
    log_info!("Starting CAN receive loop");
    loop {
        match can_rx.receive().await {
            Ok(message) => {
                if let Err(e) = dispatcher.dispatch(shared, &message) {
                    log_trace!("Dropped frame {}: {:?}", message.id(), e);
                }
            }
            Err(e) => {
                log_error!("Error receiving CAN frame: {:?}", Debug2DefmtWrapper(e));
                delay.delay_ms(150).await;
            }
        }
    }
}
