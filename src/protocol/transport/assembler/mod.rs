//! Accumulation buffer: rebuilds logical messages from the payloads of
//! consecutive CAN frames.
//!
//! There is a single logical peer per node address, so unlike multi-session
//! reassembly schemes the assembler keeps exactly one buffer. It is cleared
//! whenever a complete message is handed out; nothing carries over to the next
//! message, whether or not the one handed out turns out to be valid.
use crate::protocol::transport::message::{message_len, MessageBytes, MAX_MESSAGE_BYTES};
use crate::protocol::transport::MAX_FRAME_PAYLOAD;

/// Enough for the largest message plus the tail of the frame that completed it.
pub const ASSEMBLER_CAPACITY: usize = MAX_MESSAGE_BYTES + MAX_FRAME_PAYLOAD - 1;

//==================================================================================Enums and Structs
#[derive(Debug, PartialEq, Eq)]
pub enum AssemblyResult {
    /// Payload larger than a CAN frame can carry; not buffered.
    Ignored,
    /// Payload appended, the message is still incomplete.
    FragmentConsumed,
    /// The announced length has been reached. The buffer is empty again.
    MessageComplete(MessageBytes),
}

/// Single accumulation buffer.
#[derive(Debug, Clone, Copy)]
pub struct MessageAssembler {
    buffer: [u8; ASSEMBLER_CAPACITY],
    len: usize,
}

impl Default for MessageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageAssembler {
    pub const fn new() -> Self {
        Self {
            buffer: [0; ASSEMBLER_CAPACITY],
            len: 0,
        }
    }

    /// Bytes accumulated so far.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop any partial message.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    //==================================================================================Process Functions
    /// Append one frame payload and hand out the message once complete.
    ///
    /// Bytes past the announced length (the rest of the completing frame) are
    /// discarded with the buffer.
    pub fn process_frame(&mut self, payload: &[u8]) -> AssemblyResult {
        if payload.len() > MAX_FRAME_PAYLOAD {
            return AssemblyResult::Ignored;
        }

        // Never overflows: a message completes at most `MAX_MESSAGE_BYTES`
        // in, and the buffer is emptied as soon as it does.
        let end = self.len + payload.len();
        self.buffer[self.len..end].copy_from_slice(payload);
        self.len = end;

        match message_len(self.buffered()) {
            Some(expected) if self.len >= expected => {
                let mut message = MessageBytes::new();
                // `expected` is at most MAX_MESSAGE_BYTES, so this cannot fail.
                let _ = message.extend_from_slice(&self.buffer[..expected]);
                self.clear();
                AssemblyResult::MessageComplete(message)
            }
            _ => AssemblyResult::FragmentConsumed,
        }
    }
}
