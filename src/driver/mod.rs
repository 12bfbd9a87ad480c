pub mod adc;
pub mod can_bus;
pub mod clock;
pub mod indicator;
pub mod power;
pub mod pyro;
