//! Operational state machine of the impersonated module.
//!
//! Transitions are triggered by decoded commands (plus the local
//! "application loaded" event) and drive the RF chain through [`Board`].
//! The stored state is authoritative: a failed actuator call is logged and the
//! transition still completes, physical health being surfaced separately via
//! the [`HealthMonitor`].
use crate::fmt::Debug2Format;
use crate::infra::board::{Board, Indicator};
use crate::protocol::commands::EcmState;

pub mod health;
pub use health::{AlwaysHealthy, HealthMonitor};

/// Stored operational state, ordered by lifecycle progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationalState {
    Started,
    Initialised,
    StandbyNoMission,
    StandbyWithMission,
    Jamming,
}

impl OperationalState {
    /// `true` for both standby variants.
    pub const fn is_standby(self) -> bool {
        matches!(
            self,
            OperationalState::StandbyNoMission | OperationalState::StandbyWithMission
        )
    }

    /// Wire presentation for a given health flag.
    ///
    /// Started and Initialised have no error presentation.
    pub const fn presentation(self, healthy: bool) -> EcmState {
        match (self, healthy) {
            (OperationalState::Started, _) => EcmState::Started,
            (OperationalState::Initialised, _) => EcmState::Initialised,
            (OperationalState::StandbyNoMission, true) => EcmState::StandbyNoMission,
            (OperationalState::StandbyNoMission, false) => EcmState::StandbyNoMissionWithError,
            (OperationalState::StandbyWithMission, true) => EcmState::StandbyWithMission,
            (OperationalState::StandbyWithMission, false) => EcmState::StandbyWithMissionWithError,
            (OperationalState::Jamming, true) => EcmState::Jamming,
            (OperationalState::Jamming, false) => EcmState::JammingWithError,
        }
    }
}

/// Owns the stored state, the board and the health source.
#[derive(Debug)]
pub struct StateHandler<B: Board, H: HealthMonitor> {
    state: OperationalState,
    board: B,
    health: H,
}

impl<B: Board, H: HealthMonitor> StateHandler<B, H> {
    /// Create the handler in `Started` and power the module up (supply, fans).
    pub fn new(mut board: B, health: H) -> Self {
        if let Err(e) = board.enable_supply(true) {
            error!("Unable to enable the power supply: {:?}", Debug2Format(&e));
        }
        if let Err(e) = board.enable_fans(true) {
            error!("Unable to enable the fans: {:?}", Debug2Format(&e));
        }
        Self {
            state: OperationalState::Started,
            board,
            health,
        }
    }

    //==================================================================================EVENTS
    /// Leave the boot states. No-op once in standby or beyond.
    pub fn start(&mut self) {
        if self.state <= OperationalState::Initialised {
            self.transition(OperationalState::StandbyNoMission);
        } else {
            debug!("start ignored in {:?}", self.state);
        }
    }

    /// Key the transmitter: RF LED on, amplifier enabled then unmuted.
    pub fn start_jamming(&mut self) {
        self.transition(OperationalState::Jamming);
        self.board.set_indicator(Indicator::Rf, true);
        if let Err(e) = self.board.enable_amplifier(true) {
            error!("Unable to enable the amplifier: {:?}", Debug2Format(&e));
        }
        self.board.set_amplifier_mute(false);
    }

    /// Unkey the transmitter: RF LED off, amplifier muted then disabled.
    pub fn stop_jamming(&mut self) {
        self.transition(OperationalState::StandbyWithMission);
        self.board.set_indicator(Indicator::Rf, false);
        self.board.set_amplifier_mute(true);
        if let Err(e) = self.board.enable_amplifier(false) {
            error!("Unable to disable the amplifier: {:?}", Debug2Format(&e));
        }
    }

    /// Forget the mission. Only honoured in standby.
    // TODO: erase the stored mission file once mission upload is handled.
    pub fn zeroise(&mut self) {
        if self.state.is_standby() {
            self.transition(OperationalState::StandbyNoMission);
        } else {
            debug!("zeroise ignored in {:?}", self.state);
        }
    }

    /// A mission was installed locally.
    pub fn application_loaded(&mut self) {
        if self.state == OperationalState::StandbyNoMission {
            self.transition(OperationalState::StandbyWithMission);
        } else {
            debug!("application-loaded ignored in {:?}", self.state);
        }
    }

    //==================================================================================QUERIES
    /// Stored state, without health remapping.
    pub fn operational_state(&self) -> OperationalState {
        self.state
    }

    /// Composite state as reported on the bus.
    pub fn current_state(&self) -> EcmState {
        self.state.presentation(self.health.health_ok())
    }

    pub fn health_ok(&self) -> bool {
        self.health.health_ok()
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    fn transition(&mut self, next: OperationalState) {
        if self.state != next {
            info!("State {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }
}
