pub mod can_bus;
pub mod debug2defmt_wrapper;
pub mod ticker;
pub mod wrapping_millis;
