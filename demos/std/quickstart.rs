//! Minimal walk-through: feed a bus master's commands to a session and print
//! what an active node would put back on the bus.
//!
//! Run with `cargo run --example quickstart`.
use blackstar_ecm::infra::board::{Board, Indicator, PowerLevels};
use blackstar_ecm::protocol::commands::Command;
use blackstar_ecm::protocol::session::{ProtocolSession, ResponsePolicy, SessionConfig};
use blackstar_ecm::protocol::state::{AlwaysHealthy, StateHandler};
use blackstar_ecm::protocol::transport::chunker::FrameChunker;
use blackstar_ecm::protocol::transport::message::{encode_command, ResponseView};
use blackstar_ecm::protocol::transport::node_address;

/// Board that only prints what it is asked to do.
struct PrintBoard;

impl Board for PrintBoard {
    type Error = ();

    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        println!("  board: {indicator:?} LED {}", if on { "on" } else { "off" });
    }
    fn set_amplifier_mute(&mut self, muted: bool) {
        println!("  board: amplifier muted={muted}");
    }
    fn enable_amplifier(&mut self, enable: bool) -> Result<(), ()> {
        println!("  board: amplifier enabled={enable}");
        Ok(())
    }
    fn enable_fans(&mut self, enable: bool) -> Result<(), ()> {
        println!("  board: fans enabled={enable}");
        Ok(())
    }
    fn enable_supply(&mut self, enable: bool) -> Result<(), ()> {
        println!("  board: supply enabled={enable}");
        Ok(())
    }
    fn read_power_levels(&mut self) -> Result<PowerLevels, ()> {
        Ok(PowerLevels {
            forward_uv: 1_250_000,
            reverse_uv: 40_000,
        })
    }
    fn slot_number(&self) -> u8 {
        1
    }
    fn request_reboot(&mut self) -> Result<(), ()> {
        println!("  board: reboot");
        Ok(())
    }
}

fn main() {
    let state = StateHandler::new(PrintBoard, AlwaysHealthy);
    let config = SessionConfig::default().with_policy(ResponsePolicy::Active);
    let mut session = ProtocolSession::from_board_slot(state, config);
    let node = node_address(1);
    println!("node address {node:#x}");

    let script = [
        Command::Ping,
        Command::Start,
        Command::StartJamming,
        Command::GetState,
        Command::EcmGetPowerMonitorReading,
        Command::StopJamming,
        Command::GetState,
    ];

    for command in script {
        println!("-> {}", command.name());
        let message = match encode_command(node, command.id(), &[]) {
            Ok(message) => message,
            Err(e) => {
                println!("   cannot encode: {e}");
                continue;
            }
        };

        for frame in FrameChunker::new(node, message.as_slice()).build() {
            let result = session.on_frame_received(&frame);
            let Some(response) = result.outbound() else {
                continue;
            };
            match ResponseView::parse(response.as_slice()) {
                Ok(view) => println!(
                    "<- code {} for {:#06x}, parameters {:02x?} ({} frames)",
                    view.response_code,
                    view.command_id,
                    view.parameters,
                    FrameChunker::new(node, response.as_slice()).frame_count()
                ),
                Err(e) => println!("<- invalid response: {e}"),
            }
        }
    }

    println!(
        "final state: {:?}",
        session.state().operational_state()
    );
}
