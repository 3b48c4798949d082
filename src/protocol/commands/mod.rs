//! Command catalogue generated from the command manifest.
//!
//! Exposes the typed ids ([`Command`], [`ResponseCode`], [`EcmState`]), the
//! protocol-compatibility version and the static [`COMMAND_TABLE`] the
//! session dispatches through.
use crate::core::{CommandAction, CommandDescriptor, ProtocolVersion};

include!(concat!(env!("OUT_DIR"), "/generated_commands.rs"));

/// Find the descriptor bound to `id`.
pub fn lookup(id: u16) -> Option<&'static CommandDescriptor> {
    COMMAND_TABLE
        .binary_search_by_key(&id, |descriptor| descriptor.id)
        .ok()
        .map(|index| &COMMAND_TABLE[index])
}

/// Whole catalogue, sorted by id.
pub fn table() -> &'static [CommandDescriptor] {
    &COMMAND_TABLE
}

impl Command {
    /// Descriptor of this command in the static table.
    pub fn descriptor(self) -> Option<&'static CommandDescriptor> {
        lookup(self.id())
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
