//! Legacy command protocol: command catalogue, operational state machine,
//! CAN transport, per-node session and the bus client driving it.
pub mod client;
pub mod commands;
pub mod session;
pub mod state;
pub mod transport;

#[cfg(test)]
mod testing;
