//! Minimal abstraction for an asynchronous CAN bus. Allows the library to plug
//! into various implementations (SocketCAN, embedded HAL, in-memory test bus).
use crate::protocol::transport::can_frame::CanFrame;
use futures_util::Future;

/// Contract to send and receive CAN frames asynchronously.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Emit a frame on the bus. Asynchronous to accommodate non-blocking drivers.
    fn send<'a>(
        &'a mut self,
        frame: &'a CanFrame,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;
    /// Wait for the next frame.
    ///
    /// `Ok(None)` means the link is gone (interface down, peer closed): the
    /// client treats it as a disconnect and stops.
    fn recv<'a>(
        &'a mut self,
    ) -> impl core::future::Future<Output = Result<Option<CanFrame>, Self::Error>> + 'a;
}
