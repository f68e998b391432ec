//! Port traits — the boundary between the radio control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RadioService (domain)
//! ```
//!
//! Driven adapters (the SX1280 driver, event sinks, config storage)
//! implement these traits. The [`RadioService`](super::service::RadioService)
//! consumes them via generics, so the control core never touches hardware
//! directly.

use crate::config::{RadioPins, SystemConfig};

use super::state::LoRaParams;

// ───────────────────────────────────────────────────────────────
// Radio driver port (driven adapter: domain → transceiver)
// ───────────────────────────────────────────────────────────────

/// Driver-side contract for the radio transceiver.
///
/// All operations are synchronous and block on the SPI transaction until
/// the radio releases its busy line. The setter methods assume a prior
/// successful [`initialize`](RadioPort::initialize) and pre-validated
/// arguments; the service enforces both before calling.
pub trait RadioPort {
    /// Open the SPI bus and GPIO lines and bring the radio out of reset.
    ///
    /// The adapter holds at most one live hardware claim: a repeat call
    /// releases the previous claim before re-opening.
    fn initialize(
        &mut self,
        spi_dev_path: &str,
        spi_dev_num: u8,
        pins: &RadioPins,
    ) -> Result<(), DriverError>;

    /// Push the full LoRa parameter set to the transceiver.
    fn set_modulation_params(&mut self, params: &LoRaParams) -> Result<(), DriverError>;

    /// Program the RF centre frequency, in Hz.
    fn set_rf_frequency(&mut self, hz: u64) -> Result<(), DriverError>;

    /// Reclock the SPI device, in Hz.
    fn set_spi_speed(&mut self, hz: u32) -> Result<(), DriverError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / downlink)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, downlink
/// packet, test capture buffer).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting. Invalid
/// ranges are rejected with [`ConfigError::ValidationFailed`], not silently
/// clamped — a corrupted or hostile config upload must not be able to park
/// the radio on an un-commandable frequency.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`RadioPort`] operations.
///
/// Every hardware failure surfaces as one of these values; no raw OS error
/// or panic crosses the port boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// SPI bus open or device-add failed (platform return code).
    SpiOpenFailed(i32),
    /// A GPIO line could not be configured or written.
    GpioConfigFailed(i32),
    /// An SPI transfer returned an error mid-command.
    SpiTransferFailed(i32),
    /// The radio's busy line never released within the transaction budget.
    BusyTimeout,
    /// A setter was called with no live hardware claim.
    NotOpen,
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiOpenFailed(rc) => write!(f, "SPI open failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::SpiTransferFailed(rc) => write!(f, "SPI transfer failed (rc={})", rc),
            Self::BusyTimeout => write!(f, "radio busy timeout"),
            Self::NotOpen => write!(f, "radio not open"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
