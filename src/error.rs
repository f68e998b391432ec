//! Unified error types for the LoraRx firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! command-dispatch loop's error handling uniform. All variants are `Copy`
//! so they can be cheaply carried inside rejection events without
//! allocation.

use core::fmt;

use crate::app::ports::{ConfigError, DriverError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible command in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Requested RF frequency is outside the commandable range (MHz).
    InvalidFrequency(u32),
    /// Requested SPI clock is outside the commandable range (Hz).
    InvalidSpiSpeed(u32),
    /// A command that requires a brought-up radio arrived while the radio
    /// is uninitialized.
    NotInitialized,
    /// The radio driver reported a hardware failure.
    Driver(DriverError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrequency(mhz) => write!(f, "invalid frequency {} MHz", mhz),
            Self::InvalidSpiSpeed(hz) => write!(f, "invalid SPI speed {} Hz", hz),
            Self::NotInitialized => write!(f, "radio not initialized"),
            Self::Driver(e) => write!(f, "driver: {}", e),
            Self::Config(e) => write!(f, "config: {}", e),
        }
    }
}

impl From<DriverError> for Error {
    fn from(e: DriverError) -> Self {
        Self::Driver(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
