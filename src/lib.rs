//! `blackstar-ecm` library: a CAN node that impersonates an ECM of a legacy
//! device family. The crate exposes the infrastructure modules (checksum,
//! board capability interface), the protocol logic (message codec, frame
//! reassembly, command dispatch, operational state machine) and the bus client
//! that ties them to a CAN interface.
#![no_std]

#[cfg(feature = "std")]
extern crate std;

// Must come first: the logging macros are used by every other module.
#[macro_use]
mod fmt;
//==================================================================================
/// Data contract shared by the build script and the command dispatcher.
pub mod core;
/// Errors of the codec, the transmit path and the bus client.
pub mod error;
/// Checksum engine and the board capability interface.
pub mod infra;
/// Legacy command protocol: transport, command catalogue, state machine,
/// session and bus client.
pub mod protocol;
/// Host platform adapters (Linux SocketCAN).
#[cfg(feature = "socketcan")]
pub mod platform;
//==================================================================================
