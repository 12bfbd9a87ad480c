use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::signal::Signal;

use crate::common::can_bus::messages::{PowerControlMessage, PyroControlMessage};

/// Last control messages received from the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSnapshot {
    pub power: PowerControlMessage,
    pub pyro: PyroControlMessage,
}

impl ControlSnapshot {
    pub const fn new() -> Self {
        Self {
            power: PowerControlMessage::new(),
            pyro: PyroControlMessage::new(),
        }
    }
}

/// State handed from the receive path to the main loop.
///
/// The receive path may run in interrupt context and preempt the main loop at
/// any point. Every access to the control mirrors goes through `M`'s critical
/// section, so with a `CriticalSectionRawMutex` a reader can never observe a
/// half written message. Receive events are edge flags: the dispatcher sets
/// them, the main loop consumes them. Timestamps are never written from the
/// receive path.
pub struct RcuSharedState<M: RawMutex> {
    controls: BlockingMutex<M, RefCell<ControlSnapshot>>,
    heartbeat_received: Signal<M, ()>,
    power_control_received: Signal<M, ()>,
    pyro_control_received: Signal<M, ()>,
}

impl<M: RawMutex> RcuSharedState<M> {
    pub const fn new() -> Self {
        Self {
            controls: BlockingMutex::new(RefCell::new(ControlSnapshot::new())),
            heartbeat_received: Signal::new(),
            power_control_received: Signal::new(),
            pyro_control_received: Signal::new(),
        }
    }

    pub fn notify_heartbeat(&self) {
        self.heartbeat_received.signal(());
    }

    pub fn store_power_control(&self, message: PowerControlMessage) {
        self.controls.lock(|controls| {
            controls.borrow_mut().power = message;
        });
        self.power_control_received.signal(());
    }

    pub fn store_pyro_control(&self, message: PyroControlMessage) {
        self.controls.lock(|controls| {
            controls.borrow_mut().pyro = message;
        });
        self.pyro_control_received.signal(());
    }

    /// Copies both mirrors out in one critical section.
    pub fn control_snapshot(&self) -> ControlSnapshot {
        self.controls.lock(|controls| *controls.borrow())
    }

    pub fn take_heartbeat_received(&self) -> bool {
        self.heartbeat_received.try_take().is_some()
    }

    pub fn take_power_control_received(&self) -> bool {
        self.power_control_received.try_take().is_some()
    }

    pub fn take_pyro_control_received(&self) -> bool {
        self.pyro_control_received.try_take().is_some()
    }
}

impl<M: RawMutex> Default for RcuSharedState<M> {
    fn default() -> Self {
        Self::new()
    }
}
