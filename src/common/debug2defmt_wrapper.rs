use core::fmt;

/// Lets driver errors that only implement `Debug` be logged through both
/// logging back-ends.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debug2DefmtWrapper<T: fmt::Debug>(
    #[cfg_attr(feature = "defmt", defmt(Debug2Format))] pub T,
);
