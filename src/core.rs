//! Defines the "data contract" between `build.rs` (the scribe) and
//! the session dispatcher (the interpreter).
//!
//! `build.rs` reads the command manifest and emits a static table of
//! [`CommandDescriptor`]s. The session looks command ids up in that table and
//! executes the attached [`CommandAction`]; no command-specific branching lives
//! in the session itself.

// Types in this module are primarily used by generated code.
#![allow(dead_code)]

/// Largest parameter block a response can carry: the length byte tops out at
/// 255 and four of those bytes are the recipient and the two 16-bit ids.
pub const MAX_PARAMETER_BYTES: usize = 251;

/// Semantic action bound to a command id.
///
/// Most of the legacy command space only needs an acknowledgement; the other
/// variants either produce parameter bytes or drive the state machine.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CommandAction {
    /// Answer `Ok` without parameters and without side effects.
    Acknowledge,
    /// Answer `Ok` with a fixed parameter block (serial number, product id…).
    Fixed(&'static [u8]),
    /// `start` event of the state machine.
    Start,
    /// `start-jamming` event of the state machine.
    StartJamming,
    /// `stop-jamming` event of the state machine.
    StopJamming,
    /// `zeroise` event of the state machine.
    Zeroise,
    /// Report the composite (health-aware) state as a 16-bit value.
    ReportState,
    /// Top-level built-in test: one byte, `0x00` when healthy.
    BuiltInTest,
    /// Report the supported frequency range (two 64-bit values, Hz).
    Capabilities,
    /// Report the protocol-compatibility version (software + bootloader).
    SoftwareVersion,
    /// Report the FPGA version (not applicable, all zero).
    FpgaVersion,
    /// Sample the RF power monitor (forward/reverse, microvolts).
    PowerMonitorReading,
    /// Restart the operating system.
    Reboot,
}

/// Entry of the static command table.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// 16-bit command id as carried on the wire.
    pub id: u16,
    /// Catalogue name (diagnostics).
    pub name: &'static str,
    /// Action executed when the command is received.
    pub action: CommandAction,
}

/// Semantic version of the command/state id catalogue this node speaks.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ProtocolVersion {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
}
