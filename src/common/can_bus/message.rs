use core::fmt::Debug;
use packed_struct::prelude::*;
use packed_struct::types::bits::ByteArray;

use super::id::{CanBusStandardId, RcuId};
use super::CanBusSendError;
use crate::driver::can_bus::CanBusTX;

/// A fixed-size payload exchanged between RCUs.
///
/// The payload length is the packed size of the struct; a frame of any other
/// length is not this message.
pub trait CanBusMessage: PackedStruct + Clone + Debug {
    fn message_type() -> u8;

    fn create_id(sender: RcuId) -> CanBusStandardId {
        CanBusStandardId::new(Self::message_type(), sender)
    }

    fn to_data(&self) -> Result<Self::ByteArray, PackingError> {
        self.pack()
    }

    fn from_data(data: &[u8]) -> Result<Self, PackingError> {
        Self::unpack_from_slice(data)
    }

    fn len() -> usize {
        <Self::ByteArray as ByteArray>::len()
    }
}

pub async fn send_message<T: CanBusTX, M: CanBusMessage>(
    tx: &mut T,
    sender: RcuId,
    message: &M,
) -> Result<(), CanBusSendError<T::Error>> {
    let data = message.to_data().map_err(|_| CanBusSendError::Packing)?;
    tx.send_data(M::create_id(sender).into(), data.as_bytes_slice())
        .await
        .map_err(CanBusSendError::Bus)
}
