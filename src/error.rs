//! Error definitions shared across library modules.
//! Each type models one failure domain: message decoding/encoding, the
//! multi-frame transmit path and the bus client loop.
use thiserror_no_std::Error;

//================================================================================CODEC_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures while decoding or encoding a protocol message.
pub enum MessageError {
    /// Fewer bytes than the header (or the checksum) needs.
    #[error("Message too short: {len} bytes")]
    TooShort { len: usize },
    /// The length byte announces more bytes than were provided.
    #[error("Incomplete message: expected {expected} bytes, got {actual}")]
    Incomplete { expected: usize, actual: usize },
    /// Trailing checksum does not match the message content.
    #[error("Checksum mismatch")]
    ChecksumMismatch,
    /// Parameter block cannot be described by the 8-bit length field.
    #[error("Parameters too long: {len} bytes (max {max})")]
    ParametersTooLong { len: usize, max: usize },
}

//==================================================================================SEND_ERROR
#[derive(Debug, Error)]
/// Errors encountered when transmitting a logical message as CAN frames.
pub enum SendMessageError<E: core::fmt::Debug> {
    /// CAN layer refused or failed to send a frame. Later frames were not sent.
    #[error("CAN bus send error on frame {frame_index}: {error:?}")]
    Send { frame_index: usize, error: E },
}

//==================================================================================CLIENT_ERROR
#[derive(Debug, Error)]
/// Reasons the bus client loop ended abnormally.
pub enum ClientError<E: core::fmt::Debug> {
    /// Unable to receive frames from the bus.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),
    /// The connection broke while a response was being transmitted.
    #[error("Connection broken while sending: {0}")]
    Send(SendMessageError<E>),
}

impl<E: core::fmt::Debug> From<SendMessageError<E>> for ClientError<E> {
    fn from(error: SendMessageError<E>) -> Self {
        ClientError::Send(error)
    }
}

//==================================================================================WORKER_ERROR
#[cfg(feature = "std")]
#[derive(Debug, Error)]
/// Errors surfaced by the threaded bus client.
pub enum WorkerError<E: core::fmt::Debug> {
    /// The worker thread or its runtime could not be created.
    #[error("Unable to start the worker: {0}")]
    Runtime(std::io::Error),
    /// Opening the bus failed; the loop never started.
    #[error("Unable to connect to the bus: {0:?}")]
    Connect(E),
    /// The loop ended on a bus error.
    #[error("{0}")]
    Client(ClientError<E>),
    /// The worker thread panicked.
    #[error("Worker thread panicked")]
    Panicked,
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> From<ClientError<E>> for WorkerError<E> {
    fn from(error: ClientError<E>) -> Self {
        WorkerError::Client(error)
    }
}
