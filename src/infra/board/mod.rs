//! Capability interface of the board-support collaborator.
//!
//! The protocol layer never touches registers: LEDs, the RF power amplifier,
//! the fan and PSU rails and the RF power monitor are reached only through
//! [`Board`]. Mutating operations report failure, and callers log it and carry
//! on (see `StateHandler`).

/// Front-panel indicator LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Lit while the amplifier is transmitting.
    Rf,
    Alert,
}

/// One sample of the RF power monitor, in microvolts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerLevels {
    pub forward_uv: u32,
    pub reverse_uv: u32,
}

/// Actuator and sensor capabilities needed by the state machine and the
/// status commands.
pub trait Board {
    type Error: core::fmt::Debug;

    /// Switch an indicator LED on or off.
    fn set_indicator(&mut self, indicator: Indicator, on: bool);
    /// Mute or unmute the amplifier output stage.
    fn set_amplifier_mute(&mut self, muted: bool);
    /// Power the RF amplifier up or down.
    fn enable_amplifier(&mut self, enable: bool) -> Result<(), Self::Error>;
    fn enable_fans(&mut self, enable: bool) -> Result<(), Self::Error>;
    /// Main power-supply rail.
    fn enable_supply(&mut self, enable: bool) -> Result<(), Self::Error>;
    /// Sample forward and reverse RF power.
    fn read_power_levels(&mut self) -> Result<PowerLevels, Self::Error>;
    /// Physical slot position (0-based), read from the backplane.
    fn slot_number(&self) -> u8;
    /// Ask the host to restart.
    fn request_reboot(&mut self) -> Result<(), Self::Error>;
}
