// 11-bit standard identifier layout:
//   bits 10..4: message type
//   bits  3..0: id of the sending RCU
// lower identifiers win arbitration, so control messages are numbered below
// status and heartbeat.

pub const PYRO_CONTROL_MESSAGE_TYPE: u8 = 0x04;
pub const POWER_CONTROL_MESSAGE_TYPE: u8 = 0x08;
pub const PYRO_STATUS_MESSAGE_TYPE: u8 = 0x20;
pub const POWER_STATUS_MESSAGE_TYPE: u8 = 0x24;
pub const HEARTBEAT_MESSAGE_TYPE: u8 = 0x70;

const SENDER_BITS: u32 = 4;
const SENDER_MASK: u32 = (1 << SENDER_BITS) - 1;
const MESSAGE_TYPE_MASK: u32 = 0x7F;
const STANDARD_ID_MAX: u32 = 0x7FF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RcuId {
    Main = 0x1,
    Power = 0x2,
    Pyro = 0x3,
    PowerPyro = 0x4,
}

impl TryFrom<u8> for RcuId {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x1 => Ok(RcuId::Main),
            0x2 => Ok(RcuId::Power),
            0x3 => Ok(RcuId::Pyro),
            0x4 => Ok(RcuId::PowerPyro),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanBusStandardId {
    pub message_type: u8,
    pub sender: RcuId,
}

impl CanBusStandardId {
    pub const fn new(message_type: u8, sender: RcuId) -> Self {
        Self {
            message_type,
            sender,
        }
    }

    /// Splits a raw bus identifier. Returns `None` for extended identifiers
    /// and for senders that are not a known RCU.
    pub fn from_raw(raw: u32) -> Option<Self> {
        if raw > STANDARD_ID_MAX {
            return None;
        }
        let sender = RcuId::try_from((raw & SENDER_MASK) as u8).ok()?;
        Some(Self {
            message_type: ((raw >> SENDER_BITS) & MESSAGE_TYPE_MASK) as u8,
            sender,
        })
    }

    pub const fn to_raw(self) -> u32 {
        ((self.message_type as u32 & MESSAGE_TYPE_MASK) << SENDER_BITS) | self.sender as u32
    }
}

impl From<CanBusStandardId> for u32 {
    fn from(id: CanBusStandardId) -> Self {
        id.to_raw()
    }
}
