/// The line that keeps system power on. High means powered.
#[allow(async_fn_in_trait)]
pub trait PowerSwitch {
    type Error: core::fmt::Debug;
    async fn set_enable(&mut self, enable: bool) -> Result<(), Self::Error>;
}

/// Sense input that is high while umbilical power is plugged in.
#[allow(async_fn_in_trait)]
pub trait ExternalPowerSense {
    type Error: core::fmt::Debug;
    async fn read_connected(&mut self) -> Result<bool, Self::Error>;
}
