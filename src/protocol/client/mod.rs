//! Bus client: moves frames between a [`CanBus`] and a [`ProtocolSession`].
//!
//! [`ClientRunner`] is the `no_std` core loop. It owns the bus and the session
//! and runs until a stop future resolves, the link goes away or a transport
//! error occurs. There is no reconnection: the caller decides whether to start
//! again.
//!
//! With the `std` feature, [`BusClient`] runs one runner on a dedicated worker
//! thread and offers the stop-then-join lifecycle.

use core::fmt::Debug;
use core::future::Future;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use futures_util::{future::select, future::Either, pin_mut};

use crate::error::ClientError;
use crate::infra::board::Board;
use crate::protocol::session::ProtocolSession;
use crate::protocol::state::HealthMonitor;
use crate::protocol::transport::traits::{can_bus::CanBus, message_sender::MessageSender};

#[cfg(feature = "std")]
mod worker;
#[cfg(feature = "std")]
pub use worker::BusClient;

/// Cancellation shared between the caller and the loop.
pub type StopSignal = Signal<CriticalSectionRawMutex, ()>;

/// Why the loop ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClientExit {
    /// The stop future resolved.
    Stopped,
    /// The bus reported that the link is gone.
    Disconnected,
}

/// Core loop of the bus client.
pub struct ClientRunner<C, B, H>
where
    C: CanBus,
    C::Error: Debug,
    B: Board,
    H: HealthMonitor,
{
    bus: C,
    session: ProtocolSession<B, H>,
}

impl<C, B, H> ClientRunner<C, B, H>
where
    C: CanBus,
    C::Error: Debug,
    B: Board,
    H: HealthMonitor,
{
    pub fn new(bus: C, session: ProtocolSession<B, H>) -> Self {
        Self { bus, session }
    }

    pub fn session(&self) -> &ProtocolSession<B, H> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ProtocolSession<B, H> {
        &mut self.session
    }

    /// Give back the bus and the session.
    pub fn into_parts(self) -> (C, ProtocolSession<B, H>) {
        (self.bus, self.session)
    }

    /// Process frames in delivery order until `stop` resolves.
    ///
    /// # Errors
    ///
    /// * [`ClientError::Receive`] when the bus fails to deliver a frame.
    /// * [`ClientError::Send`] when a response could not be fully
    ///   transmitted: the connection is considered broken.
    pub async fn run_until<S>(&mut self, stop: S) -> Result<ClientExit, ClientError<C::Error>>
    where
        S: Future<Output = ()>,
    {
        pin_mut!(stop);
        info!(
            "Bus client running as node {:#x}",
            self.session.node_address()
        );

        loop {
            let received = {
                let recv = self.bus.recv();
                pin_mut!(recv);
                match select(stop.as_mut(), recv).await {
                    Either::Left(((), _)) => {
                        info!("Bus client stopped");
                        return Ok(ClientExit::Stopped);
                    }
                    Either::Right((received, _)) => received,
                }
            };

            let frame = match received {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    warn!("CAN link closed, bus client exiting");
                    return Ok(ClientExit::Disconnected);
                }
                Err(e) => {
                    error!("CAN receive failed: {:?}", crate::fmt::Debug2Format(&e));
                    return Err(ClientError::Receive(e));
                }
            };

            let result = self.session.on_frame_received(&frame);
            if let Some(response) = result.outbound() {
                let node_address = self.session.node_address();
                if let Err(e) = self.bus.send_message(node_address, response.as_slice()).await {
                    error!("Connection broken while sending: {:?}", crate::fmt::Debug2Format(&e));
                    return Err(ClientError::Send(e));
                }
            }
        }
    }

    /// [`run_until`](Self::run_until) driven by a [`StopSignal`].
    pub async fn run_until_signalled(
        &mut self,
        stop: &StopSignal,
    ) -> Result<ClientExit, ClientError<C::Error>> {
        self.run_until(stop.wait()).await
    }
}
