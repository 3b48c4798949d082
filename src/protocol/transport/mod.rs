//! Transport layer of the legacy command protocol: CAN frame representation,
//! message codec, multi-frame reassembly, outbound chunking and the bus
//! abstraction traits.
//!
//! ## Addressing
//!
//! Every node sends with its own address as the CAN identifier. Module slots
//! map to the reserved range `0x0A..=0x0E`; the bus master (MCM) lives at
//! `0x01` and is the recipient of every response.

pub mod assembler;
pub mod can_frame;
pub mod chunker;
pub mod message;
pub mod traits;

/// Node address of slot 0.
pub const NODE_ADDRESS_BASE: u8 = 0x0A;

/// Number of physical module slots.
pub const NODE_SLOT_COUNT: u8 = 5;

/// Identifiers accepted into the accumulation buffer.
pub const NODE_ADDRESS_RANGE: core::ops::RangeInclusive<u16> =
    NODE_ADDRESS_BASE as u16..=(NODE_ADDRESS_BASE + NODE_SLOT_COUNT - 1) as u16;

/// Recipient value addressing every node.
pub const BROADCAST_ADDRESS: u8 = 0x00;

/// Fixed address of the bus master.
pub const MASTER_ADDRESS: u8 = 0x01;

/// Payload ceiling of a classic CAN frame.
pub const MAX_FRAME_PAYLOAD: usize = 8;

/// Node address of a physical slot.
pub const fn node_address(slot: u8) -> u8 {
    NODE_ADDRESS_BASE.wrapping_add(slot)
}
