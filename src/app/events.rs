//! Outbound application events.
//!
//! The [`RadioService`](super::service::RadioService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, encode into a downlink
//! packet, record in a test buffer.

use serde::{Deserialize, Serialize};

use crate::config::RadioPins;
use crate::error::Error;

use super::ports::DriverError;
use super::state::LoRaParams;

/// Structured events emitted by the radio control core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// No-operation command accepted (carries the firmware version).
    Noop { version: &'static str },

    /// Radio hardware brought up successfully.
    RadioInitialized,

    /// LoRa parameters applied (echoes the headline modulation values).
    LoRaParamsSet { sf: u8, bw: u8, cr: u8 },

    /// RF frequency retuned, in MHz.
    FrequencySet(u32),

    /// SPI bus reclocked, in Hz.
    SpiSpeedSet(u32),

    /// A command was rejected before mutating anything.
    CommandRejected {
        command: &'static str,
        reason: Error,
    },

    /// A driver call failed after the state write was already applied.
    /// The command still counts as accepted; this event and the fault
    /// counter are the only trace of the divergence.
    DriverFault {
        command: &'static str,
        error: DriverError,
    },

    /// On-demand radio configuration snapshot.
    RadioTelemetry(RadioTlm),

    /// Periodic housekeeping snapshot.
    StatusTelemetry(StatusTlm),
}

/// Full radio configuration snapshot, a direct mirror of the current
/// [`RadioConfig`](super::state::RadioConfig) plus the static SPI device
/// identity and pin assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioTlm {
    pub spi_dev_path: heapless::String<{ crate::config::SPI_DEV_PATH_LEN }>,
    pub spi_dev_num: u8,
    pub spi_speed_hz: u32,
    pub radio_pins: RadioPins,
    pub frequency_mhz: u32,
    pub lora: LoRaParams,
}

/// Housekeeping counters and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTlm {
    pub valid_cmd_cnt: u16,
    pub invalid_cmd_cnt: u16,
    pub driver_fault_cnt: u16,
    pub radio_initialized: bool,
}
