/// Continuity sense of one channel. `true` means the device circuit is closed.
#[allow(async_fn_in_trait)]
pub trait Continuity {
    type Error: core::fmt::Debug;
    async fn read_continuity(&mut self) -> Result<bool, Self::Error>;
}

/// Firing output of one pyro channel. `true` drives current into the device.
#[allow(async_fn_in_trait)]
pub trait PyroCtrl {
    type Error: core::fmt::Debug;
    async fn set_enable(&mut self, enable: bool) -> Result<(), Self::Error>;
}

/// Always reports a device connected.
pub struct DummyContinuity {}

impl Continuity for DummyContinuity {
    type Error = ();

    async fn read_continuity(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Accepts every command and drives nothing.
pub struct DummyPyroCtrl {}

impl PyroCtrl for DummyPyroCtrl {
    type Error = ();

    async fn set_enable(&mut self, _enable: bool) -> Result<(), Self::Error> {
        Ok(())
    }
}
