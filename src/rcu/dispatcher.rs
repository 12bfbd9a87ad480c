use embassy_sync::blocking_mutex::raw::RawMutex;

use super::config::RcuRole;
use super::shared_state::RcuSharedState;
use crate::common::can_bus::id::{
    CanBusStandardId, RcuId, HEARTBEAT_MESSAGE_TYPE, POWER_CONTROL_MESSAGE_TYPE,
    PYRO_CONTROL_MESSAGE_TYPE,
};
use crate::common::can_bus::message::CanBusMessage;
use crate::common::can_bus::messages::{
    HeartbeatMessage, PowerControlMessage, PyroControlMessage,
};
use crate::driver::can_bus::CanBusRawMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxEvent {
    Heartbeat,
    PowerControl,
    PyroControl,
    /// Not addressed to this role, or not from the peer.
    Ignored,
}

/// A frame that matched a known message but was dropped.
///
/// Nothing counts these; the caller may log them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxError {
    LengthMismatch {
        message_type: u8,
        expected: usize,
        actual: usize,
    },
    Malformed {
        message_type: u8,
    },
}

/// Matches inbound frames against the messages this role consumes and
/// publishes them to the shared state. Safe to call from interrupt context
/// when the shared state uses a critical-section mutex.
#[derive(Debug, Clone, Copy)]
pub struct MessageDispatcher {
    role: RcuRole,
    peer: RcuId,
}

impl MessageDispatcher {
    pub const fn new(role: RcuRole, peer: RcuId) -> Self {
        Self { role, peer }
    }

    pub fn dispatch<M: RawMutex>(
        &self,
        shared: &RcuSharedState<M>,
        message: &impl CanBusRawMessage,
    ) -> Result<RxEvent, RxError> {
        let id = match CanBusStandardId::from_raw(message.id()) {
            Some(id) if id.sender == self.peer => id,
            _ => return Ok(RxEvent::Ignored),
        };
        let data = message.data();

        match id.message_type {
            HEARTBEAT_MESSAGE_TYPE => {
                // the main loop stamps the arrival time
                decode::<HeartbeatMessage>(data)?;
                shared.notify_heartbeat();
                Ok(RxEvent::Heartbeat)
            }
            POWER_CONTROL_MESSAGE_TYPE if self.role.has_power() => {
                let control = decode::<PowerControlMessage>(data)?;
                shared.store_power_control(control);
                Ok(RxEvent::PowerControl)
            }
            PYRO_CONTROL_MESSAGE_TYPE if self.role.has_pyro() => {
                let control = decode::<PyroControlMessage>(data)?;
                shared.store_pyro_control(control);
                Ok(RxEvent::PyroControl)
            }
            _ => Ok(RxEvent::Ignored),
        }
    }
}

fn check_length<T: CanBusMessage>(data: &[u8]) -> Result<(), RxError> {
    if data.len() != T::len() {
        return Err(RxError::LengthMismatch {
            message_type: T::message_type(),
            expected: T::len(),
            actual: data.len(),
        });
    }
    Ok(())
}

fn decode<T: CanBusMessage>(data: &[u8]) -> Result<T, RxError> {
    check_length::<T>(data)?;
    T::from_data(data).map_err(|_| RxError::Malformed {
        message_type: T::message_type(),
    })
}
