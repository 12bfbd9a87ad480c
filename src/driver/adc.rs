use core::marker::PhantomData;

pub trait UnitType: Clone {}

/// Millivolts, already scaled by the analog driver.
#[derive(Debug, Clone)]
pub struct Millivolt;

impl UnitType for Millivolt {}

/// Milliamps, already scaled by the analog driver.
#[derive(Debug, Clone)]
pub struct Milliamp;

impl UnitType for Milliamp {}

/// Unscaled converter counts.
#[derive(Debug, Clone)]
pub struct RawCounts;

impl UnitType for RawCounts {}

/// One analog channel. Conversion from counts to the unit `U` is the
/// driver's job; calibration constants belong to the integrator.
#[allow(async_fn_in_trait)]
pub trait ADC<U: UnitType> {
    type Error: core::fmt::Debug;

    async fn read(&mut self) -> Result<u16, Self::Error>;
}

/// Always reads the same value.
pub struct DummyADC<U: UnitType> {
    _phantom_unit: PhantomData<U>,
    value: u16,
}

impl<U: UnitType> DummyADC<U> {
    pub fn new(value: u16) -> Self {
        Self {
            _phantom_unit: PhantomData,
            value,
        }
    }
}

impl<U: UnitType> ADC<U> for DummyADC<U> {
    type Error = ();

    async fn read(&mut self) -> Result<u16, ()> {
        Ok(self.value)
    }
}
