//! Host platform adapters.
pub mod socketcan;
