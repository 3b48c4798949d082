//! Board stand-in used by the binary: it records and logs what the protocol
//! asks for. Register-level drivers plug in through the same `Board` trait.
use std::io;
use std::process::Command;

use blackstar_ecm::infra::board::{Board, Indicator, PowerLevels};
use tracing::{info, warn};

#[derive(Debug)]
pub struct HostBoard {
    slot: u8,
    allow_reboot: bool,
    amplifier: bool,
    muted: bool,
    fans: bool,
    supply: bool,
}

impl HostBoard {
    pub fn new(slot: u8, allow_reboot: bool) -> Self {
        Self {
            slot,
            allow_reboot,
            amplifier: false,
            muted: true,
            fans: false,
            supply: false,
        }
    }

    /// Amplifier off and muted, RF LED off, rails down.
    pub fn apply_safe_values(&mut self) {
        self.set_amplifier_mute(true);
        self.set_indicator(Indicator::Rf, false);
        self.set_indicator(Indicator::Alert, false);
        // The stand-in cannot fail.
        let _ = self.enable_amplifier(false);
        let _ = self.enable_supply(false);
        let _ = self.enable_fans(false);
    }
}

impl Board for HostBoard {
    type Error = io::Error;

    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        info!(?indicator, on, "indicator");
    }

    fn set_amplifier_mute(&mut self, muted: bool) {
        if self.muted != muted {
            info!(muted, "amplifier mute");
        }
        self.muted = muted;
    }

    fn enable_amplifier(&mut self, enable: bool) -> Result<(), io::Error> {
        if self.amplifier != enable {
            info!(enable, "amplifier");
        }
        self.amplifier = enable;
        Ok(())
    }

    fn enable_fans(&mut self, enable: bool) -> Result<(), io::Error> {
        if self.fans != enable {
            info!(enable, "fans");
        }
        self.fans = enable;
        Ok(())
    }

    fn enable_supply(&mut self, enable: bool) -> Result<(), io::Error> {
        if self.supply != enable {
            info!(enable, "power supply");
        }
        self.supply = enable;
        Ok(())
    }

    fn read_power_levels(&mut self) -> Result<PowerLevels, io::Error> {
        // No power monitor attached.
        Ok(PowerLevels::default())
    }

    fn slot_number(&self) -> u8 {
        self.slot
    }

    fn request_reboot(&mut self) -> Result<(), io::Error> {
        if !self.allow_reboot {
            warn!("reboot requested but not allowed (--allow-reboot), ignoring");
            return Ok(());
        }
        let status = Command::new("reboot").status()?;
        if !status.success() {
            return Err(io::Error::other(format!("reboot exited with {status}")));
        }
        Ok(())
    }
}
