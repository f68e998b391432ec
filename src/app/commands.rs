//! Inbound commands to the radio service.
//!
//! These represent actions requested by the outside world (ground uplink,
//! onboard scheduler, debug console) that the
//! [`RadioService`](super::service::RadioService) interprets and acts upon.
//! Payload size validation happens at the transport layer; the service
//! validates value ranges and preconditions.

use super::state::LoRaParams;

/// Commands that the external command surface can send into the radio core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioCommand {
    /// Liveness check; reports the firmware version and nothing else.
    Noop,

    /// Clear reportable counters. Never changes the initialized state.
    ResetStatus,

    /// Attempt to bring up the radio hardware from the configured SPI
    /// device and pin assignment.
    InitRadio,

    /// Emit a telemetry snapshot of the full radio configuration.
    SendRadioTlm,

    /// Replace the LoRa modulation parameter set (requires initialized).
    SetLoRaParams(LoRaParams),

    /// Retune the RF centre frequency, in MHz (range-checked, requires
    /// initialized).
    SetRadioFrequency(u32),

    /// Reclock the SPI bus, in Hz (range-checked, requires initialized).
    SetSpiSpeed(u32),
}

impl RadioCommand {
    /// Stable command name used in events and log lines.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "Noop",
            Self::ResetStatus => "ResetStatus",
            Self::InitRadio => "InitRadio",
            Self::SendRadioTlm => "SendRadioTlm",
            Self::SetLoRaParams(_) => "SetLoRaParams",
            Self::SetRadioFrequency(_) => "SetRadioFrequency",
            Self::SetSpiSpeed(_) => "SetSpiSpeed",
        }
    }
}
