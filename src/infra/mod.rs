//! Infrastructure shared by the protocol layer: checksum engine and the
//! capability interface of the board-support collaborator.
pub mod board;
pub mod codec;
