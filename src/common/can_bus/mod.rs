pub mod id;
pub mod message;
pub mod messages;

/// Why an outbound message did not make it onto the transmit queue.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CanBusSendError<E> {
    Packing,
    Bus(E),
}
