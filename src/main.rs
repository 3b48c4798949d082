mod cli;

use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use blackstar_ecm::error::WorkerError;
use blackstar_ecm::platform::socketcan::SocketCanError;
use blackstar_ecm::protocol::client::BusClient;
use blackstar_ecm::protocol::commands::PROTOCOL_VERSION;
use blackstar_ecm::protocol::session::{ProtocolSession, ResponsePolicy, SessionConfig};
use blackstar_ecm::protocol::state::StateHandler;
use blackstar_ecm::protocol::transport::NODE_SLOT_COUNT;
use clap::{Parser, ValueEnum};
use thiserror_no_std::Error;
use tracing::{error, info, warn};

use crate::cli::board::HostBoard;
use crate::cli::logging::{init_logging, LogFormat, LogLevel};

/// How often the main thread checks that the worker is still alive.
const WATCH_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Track commands without answering.
    Passive,
    /// Answer commands addressed to this slot or broadcast.
    Active,
}

impl From<Mode> for ResponsePolicy {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Passive => ResponsePolicy::Passive,
            Mode::Active => ResponsePolicy::Active,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "blackstar-ecm", version, about = "ECM command protocol node on SocketCAN")]
struct Cli {
    /// SocketCAN interface.
    #[arg(long, env = "BLACKSTAR_ECM_DEVICE", default_value = "can0")]
    device: String,

    /// Module slot (0-based); the node answers on 0x0A + slot.
    #[arg(long, env = "BLACKSTAR_ECM_SLOT", default_value_t = 0,
          value_parser = clap::value_parser!(u8).range(0..NODE_SLOT_COUNT as i64))]
    slot: u8,

    /// Response policy.
    #[arg(long, env = "BLACKSTAR_ECM_MODE", value_enum, default_value = "passive")]
    mode: Mode,

    /// Run the OS `reboot` command when the bus master asks for it.
    #[arg(long)]
    allow_reboot: bool,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("{0}")]
    Client(WorkerError<SocketCanError>),
    #[error("signal handler setup failed: {0}")]
    Signal(ctrlc::Error),
}

impl From<WorkerError<SocketCanError>> for AppError {
    fn from(error: WorkerError<SocketCanError>) -> Self {
        AppError::Client(error)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let version = format!(
        "{}.{}.{}",
        PROTOCOL_VERSION.major, PROTOCOL_VERSION.minor, PROTOCOL_VERSION.build
    );
    info!(
        protocol_version = %version,
        device = %cli.device,
        slot = cli.slot,
        mode = ?cli.mode,
        "starting"
    );

    let mut board = HostBoard::new(cli.slot, cli.allow_reboot);
    board.apply_safe_values();

    // Nothing runs built-in tests on this host: the flag stays healthy.
    let health = Arc::new(AtomicBool::new(true));
    let state = StateHandler::new(board, health);
    let config = SessionConfig::default().with_policy(cli.mode.into());
    let session = ProtocolSession::from_board_slot(state, config);

    let client = BusClient::start(&cli.device, session)?;

    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .map_err(AppError::Signal)?;

    loop {
        match rx.recv_timeout(WATCH_INTERVAL) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                info!("shutdown requested");
                break;
            }
            Err(mpsc::RecvTimeoutError::Timeout) if client.is_finished() => {
                warn!("bus client ended on its own");
                break;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
    }

    let exit = client.stop()?;
    info!(?exit, "stopped");
    Ok(())
}
