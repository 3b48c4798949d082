//! [`CanBus`] over a Linux SocketCAN interface (tokio flavour).
//!
//! Only standard data frames belong to the protocol; remote and error frames
//! are skipped. An interface that goes down (or disappears) is reported as a
//! disconnect, not as an error.
use std::io;
use std::string::String;

use socketcan::tokio::CanSocket;
use thiserror_no_std::Error;

use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_bus::CanBus;

/// `errno` values meaning the interface is gone.
const ENODEV: i32 = 19;
const ENETDOWN: i32 = 100;

#[derive(Debug, Error)]
/// SocketCAN failures.
pub enum SocketCanError {
    /// Creating or binding the raw socket failed.
    #[error("Unable to open CAN interface {device}: {error}")]
    Open { device: String, error: io::Error },
    #[error("CAN read failed: {0}")]
    Read(io::Error),
    #[error("CAN write failed: {0}")]
    Write(io::Error),
    /// The outbound frame cannot be expressed as a SocketCAN frame.
    #[error("Invalid outbound frame (id {id:#x})")]
    InvalidFrame { id: u16 },
}

/// Raw CAN socket bound to one interface.
pub struct SocketCanBus {
    socket: CanSocket,
    device: String,
}

impl SocketCanBus {
    /// Bind to `device`. Must be called from within a tokio runtime.
    pub fn open(device: &str) -> Result<Self, SocketCanError> {
        let socket = CanSocket::open(device).map_err(|error| SocketCanError::Open {
            device: device.into(),
            error,
        })?;
        info!("Opened CAN interface {}", device);
        Ok(Self {
            socket,
            device: device.into(),
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

fn is_link_gone(error: &io::Error) -> bool {
    matches!(error.raw_os_error(), Some(ENODEV) | Some(ENETDOWN))
}

impl CanBus for SocketCanBus {
    type Error = SocketCanError;

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        let outbound: socketcan::CanFrame = frame
            .to_embedded()
            .ok_or(SocketCanError::InvalidFrame { id: frame.id })?;
        self.socket
            .write_frame(outbound)
            .await
            .map_err(SocketCanError::Write)
    }

    async fn recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        loop {
            let inbound = match self.socket.read_frame().await {
                Ok(frame) => frame,
                Err(e) if is_link_gone(&e) => return Ok(None),
                Err(e) => return Err(SocketCanError::Read(e)),
            };
            match inbound {
                socketcan::CanFrame::Data(data) => {
                    if let Some(frame) = CanFrame::from_embedded(&data) {
                        return Ok(Some(frame));
                    }
                    trace!("Skipping extended frame");
                }
                socketcan::CanFrame::Remote(_) | socketcan::CanFrame::Error(_) => {
                    trace!("Skipping non-data frame");
                }
            }
        }
    }
}
