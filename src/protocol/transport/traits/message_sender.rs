//! `CanBus` extension sending a whole logical message: the bytes are split
//! into frames by [`FrameChunker`] and transmitted in order. The first failed
//! transmit aborts the message; remaining frames are never sent.
use crate::{
    error::SendMessageError,
    protocol::transport::chunker::FrameChunker,
    protocol::transport::traits::can_bus::CanBus,
};

/// Trait extending `CanBus` with a message-level send.
pub trait MessageSender: CanBus
where
    <Self as CanBus>::Error: core::fmt::Debug,
{
    /// Chunk `message` and send every frame with `node_address` as identifier.
    ///
    /// # Errors
    ///
    /// [`SendMessageError::Send`] with the index of the frame that failed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use blackstar_ecm::protocol::transport::traits::message_sender::MessageSender;
    ///
    /// let response = encode_response(ResponseCode::Ok.id(), Command::Ping.id(), &[])?;
    /// can_bus.send_message(session.node_address(), response.as_slice()).await?;
    /// ```
    fn send_message<'a>(
        &'a mut self,
        node_address: u8,
        message: &'a [u8],
    ) -> impl core::future::Future<Output = Result<(), SendMessageError<Self::Error>>> + 'a;
}

impl<C: CanBus> MessageSender for C
where
    C::Error: core::fmt::Debug,
{
    fn send_message<'a>(
        &'a mut self,
        node_address: u8,
        message: &'a [u8],
    ) -> impl core::future::Future<Output = Result<(), SendMessageError<Self::Error>>> + 'a {
        async move {
            for (frame_index, frame) in FrameChunker::new(node_address, message)
                .build()
                .enumerate()
            {
                self.send(&frame)
                    .await
                    .map_err(|error| SendMessageError::Send { frame_index, error })?;
            }
            Ok(())
        }
    }
}
