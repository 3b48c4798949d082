//! Protocol session: turns inbound CAN frames into decoded commands and
//! responses on behalf of one node address.
//!
//! Each accepted frame goes through the same pipeline:
//!
//! 1. reassembly in the single accumulation buffer,
//! 2. checksum and message-type validation,
//! 3. lookup of the command id in the static command table,
//! 4. execution of the bound [`CommandAction`] (state machine, board queries),
//! 5. encoding of the response.
//!
//! Whether that response goes out on the bus is a separate decision taken by
//! the [`ResponsePolicy`]. Command side effects are applied in every case so
//! the node keeps tracking the commanded state of the module it shadows.
use crate::core::{CommandAction, CommandDescriptor, MAX_PARAMETER_BYTES};
use crate::error::MessageError;
use crate::fmt::Debug2Format;
use crate::infra::board::Board;
use crate::protocol::commands::{lookup, ResponseCode, PROTOCOL_VERSION};
use crate::protocol::state::{HealthMonitor, StateHandler};
use crate::protocol::transport::assembler::{AssemblyResult, MessageAssembler};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::message::{encode_response, MessageBytes, MessageView};
use crate::protocol::transport::{node_address, BROADCAST_ADDRESS, NODE_ADDRESS_RANGE};

/// Lower bound of the advertised jamming range.
pub const DEFAULT_MIN_FREQUENCY_HZ: u64 = 500_000_000;
/// Upper bound of the advertised jamming range.
pub const DEFAULT_MAX_FREQUENCY_HZ: u64 = 2_700_000_000;

/// `GetSoftwareVersionNumber` also reports a bootloader version (three u16,
/// left at zero).
const BOOTLOADER_VERSION_BYTES: usize = 6;
/// Size of the `GetFpgaVersionNumber` answer. There is no FPGA.
const FPGA_VERSION_BYTES: usize = 12;
/// `BitTopLevel` answer for a healthy module.
const BIT_PASS: u8 = 0x00;
const BIT_FAIL: u8 = 0xFF;

//==================================================================================CONFIG
/// Whether decoded commands produce a transmitted reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponsePolicy {
    /// Observe only: responses are computed but never sent.
    #[default]
    Passive,
    /// Answer messages addressed to this node or broadcast.
    Active,
}

/// Frequency range reported by `GetEcmModuleCapabilities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencyRange {
    pub min_hz: u64,
    pub max_hz: u64,
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self {
            min_hz: DEFAULT_MIN_FREQUENCY_HZ,
            max_hz: DEFAULT_MAX_FREQUENCY_HZ,
        }
    }
}

/// Runtime configuration of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    pub policy: ResponsePolicy,
    pub frequency_range: FrequencyRange,
}

impl SessionConfig {
    pub fn with_policy(mut self, policy: ResponsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_frequency_range(mut self, min_hz: u64, max_hz: u64) -> Self {
        self.frequency_range = FrequencyRange { min_hz, max_hz };
        self
    }
}

//==================================================================================RESULTS
/// Outcome of dispatching one valid command message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Recipient field of the command.
    pub recipient: u8,
    pub command_id: u16,
    /// Catalogue entry, `None` for unknown ids.
    pub command: Option<&'static CommandDescriptor>,
    pub response_code: ResponseCode,
    /// Encoded response, addressed to the bus master.
    pub response: MessageBytes,
}

/// Result of feeding one frame to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// Identifier outside the node-address range; nothing buffered.
    Ignored,
    /// Payload buffered, message still incomplete.
    FragmentConsumed,
    /// Complete message with a bad checksum, dropped.
    ChecksumMismatch,
    /// Complete message too short to carry a command id, dropped.
    Malformed(MessageError),
    /// Valid message of another type, dropped.
    NotCommand { message_type: u8 },
    /// Command dispatched, response withheld by the policy.
    Observed(Dispatch),
    /// Command dispatched, response to transmit.
    Respond(Dispatch),
}

impl ProcessResult {
    /// Bytes to transmit, if this frame produced any.
    pub fn outbound(&self) -> Option<&MessageBytes> {
        match self {
            ProcessResult::Respond(dispatch) => Some(&dispatch.response),
            _ => None,
        }
    }

    /// Dispatch outcome, sent or not.
    pub fn dispatch(&self) -> Option<&Dispatch> {
        match self {
            ProcessResult::Observed(dispatch) | ProcessResult::Respond(dispatch) => Some(dispatch),
            _ => None,
        }
    }
}

//==================================================================================SESSION
/// One node's view of the bus: address, accumulation buffer, state machine.
#[derive(Debug)]
pub struct ProtocolSession<B: Board, H: HealthMonitor> {
    node_address: u8,
    assembler: MessageAssembler,
    state: StateHandler<B, H>,
    config: SessionConfig,
}

impl<B: Board, H: HealthMonitor> ProtocolSession<B, H> {
    /// Create the session of the module sitting in `slot`.
    pub fn new(slot: u8, state: StateHandler<B, H>, config: SessionConfig) -> Self {
        let node_address = node_address(slot);
        info!(
            "Session using node address {:#x} ({:?})",
            node_address, config.policy
        );
        Self {
            node_address,
            assembler: MessageAssembler::new(),
            state,
            config,
        }
    }

    /// Create the session using the slot reported by the board.
    pub fn from_board_slot(state: StateHandler<B, H>, config: SessionConfig) -> Self {
        let slot = state.board().slot_number();
        Self::new(slot, state, config)
    }

    pub fn node_address(&self) -> u8 {
        self.node_address
    }

    pub fn policy(&self) -> ResponsePolicy {
        self.config.policy
    }

    /// Switch between observing and answering.
    pub fn set_policy(&mut self, policy: ResponsePolicy) {
        if self.config.policy != policy {
            info!("Response policy {:?} -> {:?}", self.config.policy, policy);
        }
        self.config.policy = policy;
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &StateHandler<B, H> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateHandler<B, H> {
        &mut self.state
    }

    /// Partial message waiting for more frames.
    pub fn pending(&self) -> &[u8] {
        self.assembler.buffered()
    }

    //==================================================================================Process Functions
    /// Feed one inbound frame.
    pub fn on_frame_received(&mut self, frame: &CanFrame) -> ProcessResult {
        // Frames from any module slot are kept, not only those of this node.
        if !NODE_ADDRESS_RANGE.contains(&frame.id) {
            trace!("Ignoring frame with id {:#x}", frame.id);
            return ProcessResult::Ignored;
        }

        let message = match self.assembler.process_frame(frame.payload()) {
            AssemblyResult::Ignored => return ProcessResult::Ignored,
            AssemblyResult::FragmentConsumed => return ProcessResult::FragmentConsumed,
            AssemblyResult::MessageComplete(message) => message,
        };

        let view = match MessageView::parse(message.as_slice()) {
            Ok(view) => view,
            Err(MessageError::ChecksumMismatch) => {
                warn!(
                    "Dropping message with bad checksum: {:?}",
                    Debug2Format(&message)
                );
                return ProcessResult::ChecksumMismatch;
            }
            Err(e) => {
                warn!("Dropping malformed message: {:?}", Debug2Format(&e));
                return ProcessResult::Malformed(e);
            }
        };

        if !view.header.is_command() {
            debug!(
                "Dropping message of type {:#x}",
                view.header.message_type
            );
            return ProcessResult::NotCommand {
                message_type: view.header.message_type,
            };
        }

        let dispatch = self.dispatch(view);
        if self.should_respond(dispatch.recipient) {
            ProcessResult::Respond(dispatch)
        } else {
            ProcessResult::Observed(dispatch)
        }
    }

    /// Transmit gate.
    fn should_respond(&self, recipient: u8) -> bool {
        match self.config.policy {
            ResponsePolicy::Passive => false,
            ResponsePolicy::Active => {
                recipient == self.node_address || recipient == BROADCAST_ADDRESS
            }
        }
    }

    fn dispatch(&mut self, view: MessageView<'_>) -> Dispatch {
        let command_id = view.header.command_id;
        let command = lookup(command_id);
        let mut parameters = [0u8; MAX_PARAMETER_BYTES];

        let (response_code, len) = match command {
            Some(descriptor) => {
                debug!(
                    "Command {} ({:#06x}) for {:#x}",
                    descriptor.name, command_id, view.header.recipient
                );
                let len = self.execute(descriptor.action, &mut parameters);
                (ResponseCode::Ok, len)
            }
            None => {
                info!("Command {:#06x} not recognised", command_id);
                (ResponseCode::NotRecognised, 0)
            }
        };

        // Parameter blocks never exceed MAX_PARAMETER_BYTES, so encoding succeeds.
        let response = match encode_response(response_code.id(), command_id, &parameters[..len]) {
            Ok(response) => response,
            Err(e) => {
                error!("Unable to encode response: {:?}", Debug2Format(&e));
                MessageBytes::new()
            }
        };

        Dispatch {
            recipient: view.header.recipient,
            command_id,
            command,
            response_code,
            response,
        }
    }

    /// Run `action` and write its parameter bytes. Returns their count.
    fn execute(&mut self, action: CommandAction, out: &mut [u8; MAX_PARAMETER_BYTES]) -> usize {
        match action {
            CommandAction::Acknowledge => 0,
            CommandAction::Fixed(bytes) => {
                let len = bytes.len().min(MAX_PARAMETER_BYTES);
                out[..len].copy_from_slice(&bytes[..len]);
                len
            }
            CommandAction::Start => {
                self.state.start();
                0
            }
            CommandAction::StartJamming => {
                self.state.start_jamming();
                0
            }
            CommandAction::StopJamming => {
                self.state.stop_jamming();
                0
            }
            CommandAction::Zeroise => {
                self.state.zeroise();
                0
            }
            CommandAction::ReportState => {
                out[..2].copy_from_slice(&self.state.current_state().id().to_le_bytes());
                2
            }
            CommandAction::BuiltInTest => {
                out[0] = if self.state.health_ok() {
                    BIT_PASS
                } else {
                    BIT_FAIL
                };
                1
            }
            CommandAction::Capabilities => {
                let range = self.config.frequency_range;
                out[..8].copy_from_slice(&range.min_hz.to_le_bytes());
                out[8..16].copy_from_slice(&range.max_hz.to_le_bytes());
                16
            }
            CommandAction::SoftwareVersion => {
                out[..2].copy_from_slice(&PROTOCOL_VERSION.major.to_le_bytes());
                out[2..4].copy_from_slice(&PROTOCOL_VERSION.minor.to_le_bytes());
                out[4..6].copy_from_slice(&PROTOCOL_VERSION.build.to_le_bytes());
                out[6..6 + BOOTLOADER_VERSION_BYTES].fill(0);
                6 + BOOTLOADER_VERSION_BYTES
            }
            CommandAction::FpgaVersion => {
                out[..FPGA_VERSION_BYTES].fill(0);
                FPGA_VERSION_BYTES
            }
            CommandAction::PowerMonitorReading => {
                match self.state.board_mut().read_power_levels() {
                    Ok(levels) => {
                        out[..4].copy_from_slice(&levels.forward_uv.to_le_bytes());
                        out[4..8].copy_from_slice(&levels.reverse_uv.to_le_bytes());
                        8
                    }
                    Err(e) => {
                        error!("Unable to read power levels: {:?}", Debug2Format(&e));
                        0
                    }
                }
            }
            CommandAction::Reboot => {
                warn!("Reboot requested");
                if let Err(e) = self.state.board_mut().request_reboot() {
                    error!("Reboot failed: {:?}", Debug2Format(&e));
                }
                0
            }
        }
    }
}
