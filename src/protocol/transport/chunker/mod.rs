//! Splits an outbound logical message into CAN frames: consecutive pieces of
//! at most eight bytes, in order, all carrying the sender's node address as
//! identifier. Frames carry only their own bytes (no padding, no headers).
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::MAX_FRAME_PAYLOAD;

#[derive(Debug, Clone, Copy)]
/// Parameters shared by every frame of one message.
pub struct FrameChunker<'a> {
    node_address: u8,
    payload: &'a [u8],
}

/// Lazy iterator returning frames one by one.
#[derive(Debug, Clone)]
pub struct FrameIterator<'a> {
    node_address: u8,
    chunks: core::slice::Chunks<'a, u8>,
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = CanFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        let mut data = [0u8; MAX_FRAME_PAYLOAD];
        data[..chunk.len()].copy_from_slice(chunk);
        Some(CanFrame {
            id: self.node_address as u16,
            data,
            len: chunk.len(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for FrameIterator<'_> {}

impl<'a> FrameChunker<'a> {
    pub fn new(node_address: u8, payload: &'a [u8]) -> Self {
        Self {
            node_address,
            payload,
        }
    }

    /// Number of frames the message needs.
    pub fn frame_count(&self) -> usize {
        self.payload.len().div_ceil(MAX_FRAME_PAYLOAD)
    }

    /// Start the iteration; each call to `next` yields the next frame.
    pub fn build(self) -> FrameIterator<'a> {
        FrameIterator {
            node_address: self.node_address,
            chunks: self.payload.chunks(MAX_FRAME_PAYLOAD),
        }
    }
}
