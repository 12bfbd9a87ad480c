pub mod capability;
pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod node;
pub mod power;
pub mod power_pyro;
pub mod pyro;
pub mod scheduler;
pub mod shared_state;
pub mod shutdown_latch;
