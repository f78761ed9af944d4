//! Utilities shared by the notifier binaries: logging setup and time handling.

pub mod logger;
pub mod time;
