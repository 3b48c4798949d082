//! Board stand-in shared by the unit tests.
use crate::infra::board::{Board, Indicator, PowerLevels};

/// Keeps the last commanded value of every actuator.
#[derive(Debug, Default)]
pub(crate) struct FakeBoard {
    pub rf_led: bool,
    pub muted: bool,
    pub amplifier: bool,
    pub fans: bool,
    pub supply: bool,
    pub reboots: usize,
    pub power: PowerLevels,
    pub slot: u8,
    pub failing: bool,
}

impl FakeBoard {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    fn result(&self) -> Result<(), ()> {
        if self.failing {
            Err(())
        } else {
            Ok(())
        }
    }
}

impl Board for FakeBoard {
    type Error = ();

    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        if indicator == Indicator::Rf {
            self.rf_led = on;
        }
    }
    fn set_amplifier_mute(&mut self, muted: bool) {
        self.muted = muted;
    }
    fn enable_amplifier(&mut self, enable: bool) -> Result<(), ()> {
        self.result()?;
        self.amplifier = enable;
        Ok(())
    }
    fn enable_fans(&mut self, enable: bool) -> Result<(), ()> {
        self.result()?;
        self.fans = enable;
        Ok(())
    }
    fn enable_supply(&mut self, enable: bool) -> Result<(), ()> {
        self.result()?;
        self.supply = enable;
        Ok(())
    }
    fn read_power_levels(&mut self) -> Result<PowerLevels, ()> {
        self.result().map(|_| self.power)
    }
    fn slot_number(&self) -> u8 {
        self.slot
    }
    fn request_reboot(&mut self) -> Result<(), ()> {
        self.result()?;
        self.reboots += 1;
        Ok(())
    }
}
