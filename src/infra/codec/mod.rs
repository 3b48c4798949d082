//! Low-level codecs used by the message layer.
pub mod crc;
