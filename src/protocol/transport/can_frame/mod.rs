//! In-memory representation of a classic CAN frame with an 11-bit identifier.
use embedded_can::{Frame, Id, StandardId};

/// Largest standard (11-bit) identifier.
pub const MAX_STANDARD_ID: u16 = 0x7FF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw frame as read from the CAN bus.
pub struct CanFrame {
    /// Standard identifier. On this bus it is the sender's node address.
    pub id: u16,
    /// Payload buffer. Classic CAN frames always provide eight bytes.
    pub data: [u8; 8],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Build a frame from a payload of at most eight bytes.
    pub fn new(id: u16, payload: &[u8]) -> Option<Self> {
        if id > MAX_STANDARD_ID || payload.len() > 8 {
            return None;
        }
        let mut data = [0u8; 8];
        data[..payload.len()].copy_from_slice(payload);
        Some(Self {
            id,
            data,
            len: payload.len(),
        })
    }

    /// Valid payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(8)]
    }

    /// Convert a driver frame. Extended-id and remote frames are not part of
    /// this protocol and yield `None`.
    pub fn from_embedded<F: Frame>(frame: &F) -> Option<Self> {
        if frame.is_remote_frame() {
            return None;
        }
        match frame.id() {
            Id::Standard(id) => Self::new(id.as_raw(), frame.data()),
            Id::Extended(_) => None,
        }
    }

    /// Convert into a driver frame.
    pub fn to_embedded<F: Frame>(&self) -> Option<F> {
        let id = StandardId::new(self.id)?;
        F::new(id, self.payload())
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
