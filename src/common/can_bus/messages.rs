use packed_struct::prelude::*;

use super::id::{
    HEARTBEAT_MESSAGE_TYPE, POWER_CONTROL_MESSAGE_TYPE, POWER_STATUS_MESSAGE_TYPE,
    PYRO_CONTROL_MESSAGE_TYPE, PYRO_STATUS_MESSAGE_TYPE,
};
use super::message::CanBusMessage;

/// Unpacks a payload made only of one-byte booleans. Any nonzero byte is
/// `true`, as the main RCU tests them.
fn unpack_bool_bytes<T, const N: usize>(data: &[u8]) -> Result<T, PackingError>
where
    T: PackedStruct<ByteArray = [u8; N]>,
{
    let bytes: [u8; N] = data
        .try_into()
        .map_err(|_| PackingError::BufferSizeMismatch {
            expected: N,
            actual: data.len(),
        })?;
    T::unpack(&bytes.map(|byte| (byte != 0) as u8))
}

#[derive(PrimitiveEnum_u8, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HealthState {
    Nominal = 0,
    Degraded = 1,
    Unhealthy = 2,
}

impl HealthState {
    pub fn worst(self, other: HealthState) -> HealthState {
        if (other as u8) > (self as u8) {
            other
        } else {
            self
        }
    }
}

/// Broadcast by every node at 2 Hz.
#[derive(PackedStruct, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(bit_numbering = "msb0", endian = "lsb", size_bytes = "5")]
pub struct HeartbeatMessage {
    #[packed_field(bytes = "0", ty = "enum")]
    pub health: HealthState,
    #[packed_field(bytes = "1..=4")]
    pub uptime_s: u32,
}

impl CanBusMessage for HeartbeatMessage {
    fn message_type() -> u8 {
        HEARTBEAT_MESSAGE_TYPE
    }
}

#[derive(PackedStruct, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(bit_numbering = "msb0", size_bytes = "1")]
pub struct PowerControlMessage {
    #[packed_field(bits = "7")]
    pub shutdown_request: bool,
}

impl PowerControlMessage {
    pub const fn new() -> Self {
        Self {
            shutdown_request: false,
        }
    }
}

impl CanBusMessage for PowerControlMessage {
    fn message_type() -> u8 {
        POWER_CONTROL_MESSAGE_TYPE
    }

    fn from_data(data: &[u8]) -> Result<Self, PackingError> {
        unpack_bool_bytes::<Self, 1>(data)
    }
}

#[derive(PackedStruct, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(bit_numbering = "msb0", endian = "lsb", size_bytes = "7")]
pub struct PowerStatusMessage {
    #[packed_field(bytes = "0..=1")]
    pub voltage_12v_mv: u16,
    #[packed_field(bytes = "2..=3")]
    pub current_12v_ma: u16,
    #[packed_field(bytes = "4..=5")]
    pub current_5v_ma: u16,
    // flags byte, bit 0 first
    #[packed_field(bits = "55")]
    pub shutdown_pending: bool,
    #[packed_field(bits = "54")]
    pub external_power_connected: bool,
    #[packed_field(bits = "53")]
    pub overcurrent_12v: bool,
    #[packed_field(bits = "52")]
    pub overcurrent_5v: bool,
    #[packed_field(bits = "51")]
    pub overvoltage: bool,
    #[packed_field(bits = "50")]
    pub undervoltage: bool,
}

impl CanBusMessage for PowerStatusMessage {
    fn message_type() -> u8 {
        POWER_STATUS_MESSAGE_TYPE
    }
}

#[derive(PackedStruct, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(bit_numbering = "msb0", size_bytes = "3")]
pub struct PyroControlMessage {
    #[packed_field(bits = "7")]
    pub fire_igniter: bool,
    #[packed_field(bits = "15")]
    pub fire_drogue: bool,
    #[packed_field(bits = "23")]
    pub fire_main: bool,
}

impl PyroControlMessage {
    pub const fn new() -> Self {
        Self {
            fire_igniter: false,
            fire_drogue: false,
            fire_main: false,
        }
    }
}

impl CanBusMessage for PyroControlMessage {
    fn message_type() -> u8 {
        PYRO_CONTROL_MESSAGE_TYPE
    }

    fn from_data(data: &[u8]) -> Result<Self, PackingError> {
        unpack_bool_bytes::<Self, 3>(data)
    }
}

#[derive(PackedStruct, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packed_struct(bit_numbering = "msb0", endian = "lsb", size_bytes = "5")]
pub struct PyroStatusMessage {
    #[packed_field(bits = "7")]
    pub igniter_continuity: bool,
    #[packed_field(bits = "15")]
    pub drogue_continuity: bool,
    #[packed_field(bits = "23")]
    pub main_continuity: bool,
    #[packed_field(bytes = "3..=4")]
    pub pyro_battery_voltage_raw: u16,
}

impl CanBusMessage for PyroStatusMessage {
    fn message_type() -> u8 {
        PYRO_STATUS_MESSAGE_TYPE
    }
}
