//! Message codec of the legacy command protocol.
//!
//! ```text
//! offset  0     1       2          3..=4            5..n-2       n-2..n
//!         type  length  recipient  command id (LE)  parameters   CRC-16 (LE)
//! ```
//!
//! A message is always `length + 5` bytes long, checksum included.
//! Responses insert a 16-bit response code before the command id they
//! answer. All functions here are pure: no I/O, no session state.
use crate::core::MAX_PARAMETER_BYTES;
use crate::error::MessageError;
use crate::infra::codec::crc::{crc16_ccitt, Crc16Ccitt};
use crate::protocol::transport::MASTER_ADDRESS;

//==================================================================================Constants
/// Message type of commands and responses.
pub const MESSAGE_TYPE_COMMAND: u8 = 0xC0;

pub const TYPE_FIELD: usize = 0;
pub const LENGTH_FIELD: usize = 1;
pub const RECIPIENT_FIELD: usize = 2;
/// First byte of the little-endian command id.
pub const COMMAND_ID_FIELD: usize = 3;
/// First parameter byte of a command.
pub const PARAMETERS_FIELD: usize = 5;

/// Bytes of a message not covered by the length field.
pub const BASE_MESSAGE_SIZE: usize = 5;
/// Length field of a response without parameters.
pub const EMPTY_RESPONSE_LENGTH: usize = 4;
/// Trailing checksum size.
pub const CHECKSUM_LEN: usize = 2;
/// Largest message the 8-bit length field can describe.
pub const MAX_MESSAGE_BYTES: usize = u8::MAX as usize + BASE_MESSAGE_SIZE;

//==================================================================================MessageBytes
/// Owned, fixed-capacity message buffer (no heap).
#[derive(Clone, Copy)]
pub struct MessageBytes {
    len: usize,
    data: [u8; MAX_MESSAGE_BYTES],
}

impl Default for MessageBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MessageBytes {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for MessageBytes {}

impl core::fmt::Debug for MessageBytes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("MessageBytes").field(&self.as_slice()).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MessageBytes {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "MessageBytes({=[u8]:#x})", self.as_slice())
    }
}

impl MessageBytes {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_MESSAGE_BYTES],
        }
    }

    /// Copy `bytes` into a new buffer. `None` when they do not fit.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let mut buffer = Self::new();
        buffer.extend_from_slice(bytes).ok()?;
        Some(buffer)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append bytes, failing without modification when capacity is exceeded.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), MessageError> {
        let end = self.len + bytes.len();
        if end > MAX_MESSAGE_BYTES {
            return Err(MessageError::ParametersTooLong {
                len: end,
                max: MAX_MESSAGE_BYTES,
            });
        }
        self.data[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl AsRef<[u8]> for MessageBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

//==================================================================================Framing
/// Total size announced by the length byte, once it has arrived.
pub fn message_len(buffer: &[u8]) -> Option<usize> {
    buffer
        .get(LENGTH_FIELD)
        .map(|&length| length as usize + BASE_MESSAGE_SIZE)
}

/// `true` once `buffer` holds at least the announced number of bytes.
pub fn is_complete(buffer: &[u8]) -> bool {
    message_len(buffer).is_some_and(|expected| buffer.len() >= expected)
}

//==================================================================================Checksum
/// CRC-16/CCITT of `bytes`, as appended to outgoing messages.
pub fn checksum(bytes: &[u8]) -> u16 {
    crc16_ccitt(bytes)
}

/// Check-by-inclusion: run the CRC over the body and then over the stored
/// checksum presented high byte first; a valid message leaves a zero residue.
pub fn verify_checksum(message: &[u8]) -> bool {
    let Some(split) = message.len().checked_sub(CHECKSUM_LEN) else {
        return false;
    };
    let (body, stored) = message.split_at(split);
    let mut crc = Crc16Ccitt::new();
    crc.update(body);
    crc.update(&[stored[1], stored[0]]);
    crc.finalize() == 0
}

//==================================================================================Header
/// Fixed-offset fields shared by every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageHeader {
    pub message_type: u8,
    pub length: u8,
    pub recipient: u8,
    pub command_id: u16,
}

impl MessageHeader {
    /// Extract the header fields. No validation beyond the size.
    pub fn decode(buffer: &[u8]) -> Result<Self, MessageError> {
        if buffer.len() < PARAMETERS_FIELD {
            return Err(MessageError::TooShort { len: buffer.len() });
        }
        Ok(Self {
            message_type: buffer[TYPE_FIELD],
            length: buffer[LENGTH_FIELD],
            recipient: buffer[RECIPIENT_FIELD],
            command_id: u16::from_le_bytes([
                buffer[COMMAND_ID_FIELD],
                buffer[COMMAND_ID_FIELD + 1],
            ]),
        })
    }

    /// `true` for command/response messages.
    pub fn is_command(&self) -> bool {
        self.message_type == MESSAGE_TYPE_COMMAND
    }
}

/// Check completeness and checksum, then return the exact message slice.
fn validated(bytes: &[u8]) -> Result<&[u8], MessageError> {
    let expected = message_len(bytes).ok_or(MessageError::TooShort { len: bytes.len() })?;
    if bytes.len() < expected {
        return Err(MessageError::Incomplete {
            expected,
            actual: bytes.len(),
        });
    }
    let message = &bytes[..expected];
    if message.len() < PARAMETERS_FIELD + CHECKSUM_LEN {
        return Err(MessageError::TooShort { len: message.len() });
    }
    if !verify_checksum(message) {
        return Err(MessageError::ChecksumMismatch);
    }
    Ok(message)
}

//==================================================================================Views
/// Validated inbound message: header plus parameter bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageView<'a> {
    pub header: MessageHeader,
    pub parameters: &'a [u8],
}

impl<'a> MessageView<'a> {
    /// Validate `bytes` (bytes past the announced length are ignored).
    pub fn parse(bytes: &'a [u8]) -> Result<Self, MessageError> {
        let message = validated(bytes)?;
        let header = MessageHeader::decode(message)?;
        Ok(Self {
            header,
            parameters: &message[PARAMETERS_FIELD..message.len() - CHECKSUM_LEN],
        })
    }
}

/// Validated response: `{response code, answered command id, parameters}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseView<'a> {
    pub recipient: u8,
    pub response_code: u16,
    pub command_id: u16,
    pub parameters: &'a [u8],
}

impl<'a> ResponseView<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self, MessageError> {
        let message = validated(bytes)?;
        let body_end = message.len() - CHECKSUM_LEN;
        if body_end < PARAMETERS_FIELD + 2 {
            return Err(MessageError::TooShort { len: message.len() });
        }
        Ok(Self {
            recipient: message[RECIPIENT_FIELD],
            response_code: u16::from_le_bytes([message[3], message[4]]),
            command_id: u16::from_le_bytes([message[5], message[6]]),
            parameters: &message[PARAMETERS_FIELD + 2..body_end],
        })
    }
}

//==================================================================================Encoding
/// Encode a response addressed to the bus master.
pub fn encode_response(
    response_code: u16,
    command_id: u16,
    parameters: &[u8],
) -> Result<MessageBytes, MessageError> {
    if parameters.len() > MAX_PARAMETER_BYTES {
        return Err(MessageError::ParametersTooLong {
            len: parameters.len(),
            max: MAX_PARAMETER_BYTES,
        });
    }
    let length = (EMPTY_RESPONSE_LENGTH + parameters.len()) as u8;

    let mut message = MessageBytes::new();
    message.extend_from_slice(&[MESSAGE_TYPE_COMMAND, length, MASTER_ADDRESS])?;
    message.extend_from_slice(&response_code.to_le_bytes())?;
    message.extend_from_slice(&command_id.to_le_bytes())?;
    message.extend_from_slice(parameters)?;
    let crc = checksum(message.as_slice());
    message.extend_from_slice(&crc.to_le_bytes())?;
    Ok(message)
}

/// Encode a command message (what the bus master sends). Used by tooling and
/// tests to talk to a node.
pub fn encode_command(
    recipient: u8,
    command_id: u16,
    parameters: &[u8],
) -> Result<MessageBytes, MessageError> {
    let max = u8::MAX as usize + BASE_MESSAGE_SIZE - PARAMETERS_FIELD - CHECKSUM_LEN;
    if parameters.len() > max {
        return Err(MessageError::ParametersTooLong {
            len: parameters.len(),
            max,
        });
    }
    let length = (PARAMETERS_FIELD + parameters.len() + CHECKSUM_LEN - BASE_MESSAGE_SIZE) as u8;

    let mut message = MessageBytes::new();
    message.extend_from_slice(&[MESSAGE_TYPE_COMMAND, length, recipient])?;
    message.extend_from_slice(&command_id.to_le_bytes())?;
    message.extend_from_slice(parameters)?;
    let crc = checksum(message.as_slice());
    message.extend_from_slice(&crc.to_le_bytes())?;
    Ok(message)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
