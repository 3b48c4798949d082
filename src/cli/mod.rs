pub mod board;
pub mod logging;
