use heapless::Vec;

/// Classic CAN payloads are at most 8 bytes.
pub const CAN_MAX_DATA_LENGTH: usize = 8;

pub trait CanBusRawMessage {
    fn id(&self) -> u32;
    fn data(&self) -> &[u8];
}

#[allow(async_fn_in_trait)]
pub trait CanBusTX {
    type Error: core::fmt::Debug;

    /// Pushes a frame onto the transmit queue. Must not wait for arbitration.
    async fn send_data(&mut self, id: u32, data: &[u8]) -> Result<(), Self::Error>;
}

#[allow(async_fn_in_trait)]
pub trait CanBusRX {
    type Error: core::fmt::Debug;
    type Message: CanBusRawMessage;

    async fn receive(&mut self) -> Result<Self::Message, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanFrame {
    pub id: u32,
    pub data: Vec<u8, CAN_MAX_DATA_LENGTH>,
}

impl CanFrame {
    /// Returns `None` if `data` does not fit in a classic CAN frame.
    pub fn new(id: u32, data: &[u8]) -> Option<Self> {
        Some(Self {
            id,
            data: Vec::from_slice(data).ok()?,
        })
    }
}

impl CanBusRawMessage for CanFrame {
    fn id(&self) -> u32 {
        self.id
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}
