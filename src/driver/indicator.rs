/// A status LED. The RCU core only ever switches it fully on or off; blink
/// patterns come from the caller toggling it on its own ticks.
#[allow(async_fn_in_trait)]
pub trait Indicator {
    async fn set_enable(&mut self, enable: bool);
}

/// For boards without the LED fitted.
pub struct DummyIndicator {}

impl Indicator for DummyIndicator {
    async fn set_enable(&mut self, _enable: bool) {}
}
