#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Feature defmt and log are mutually exclusive and cannot be enabled together");

// must be declared first so the logging macros are visible to every other module
mod fmt;

pub mod common;
pub mod driver;
pub mod rcu;
mod rcu_main;

pub use common::can_bus::id::{CanBusStandardId, RcuId};
pub use common::wrapping_millis::WrappingMillis;
pub use rcu::config::{ConfigError, PowerThresholds, RcuConfig, RcuRole};
pub use rcu::node::{NodeState, RcuNode};
pub use rcu::shared_state::{ControlSnapshot, RcuSharedState};
pub use rcu_main::{rcu_can_rx_main, rcu_main};
