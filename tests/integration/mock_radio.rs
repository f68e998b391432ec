//! Mock radio adapter for integration tests.
//!
//! Records every driver call so tests can assert on the full command
//! history without touching a real SPI bus, and injects failures on
//! demand to exercise the error paths.

use lorarx::app::events::AppEvent;
use lorarx::app::ports::{DriverError, EventSink, RadioPort};
use lorarx::app::state::LoRaParams;
use lorarx::config::RadioPins;

// ── Driver call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum RadioCall {
    Initialize {
        path: String,
        num: u8,
        pins: RadioPins,
    },
    SetModulationParams(LoRaParams),
    SetRfFrequency(u64),
    SetSpiSpeed(u32),
}

// ── MockRadio ─────────────────────────────────────────────────

pub struct MockRadio {
    pub calls: Vec<RadioCall>,
    /// Fail the next (and every) initialize call.
    pub fail_init: bool,
    /// Fail every setter call after recording it.
    pub fail_ops: bool,
}

#[allow(dead_code)]
impl MockRadio {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_init: false,
            fail_ops: false,
        }
    }

    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::new()
        }
    }

    pub fn failing_ops() -> Self {
        Self {
            fail_ops: true,
            ..Self::new()
        }
    }

    pub fn last_call(&self) -> Option<&RadioCall> {
        self.calls.last()
    }

    pub fn init_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RadioCall::Initialize { .. }))
            .count()
    }

    pub fn setter_count(&self) -> usize {
        self.calls.len() - self.init_count()
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioPort for MockRadio {
    fn initialize(
        &mut self,
        spi_dev_path: &str,
        spi_dev_num: u8,
        pins: &RadioPins,
    ) -> Result<(), DriverError> {
        self.calls.push(RadioCall::Initialize {
            path: spi_dev_path.to_string(),
            num: spi_dev_num,
            pins: *pins,
        });
        if self.fail_init {
            Err(DriverError::SpiOpenFailed(-1))
        } else {
            Ok(())
        }
    }

    fn set_modulation_params(&mut self, params: &LoRaParams) -> Result<(), DriverError> {
        self.calls.push(RadioCall::SetModulationParams(*params));
        if self.fail_ops {
            Err(DriverError::SpiTransferFailed(-1))
        } else {
            Ok(())
        }
    }

    fn set_rf_frequency(&mut self, hz: u64) -> Result<(), DriverError> {
        self.calls.push(RadioCall::SetRfFrequency(hz));
        if self.fail_ops {
            Err(DriverError::SpiTransferFailed(-1))
        } else {
            Ok(())
        }
    }

    fn set_spi_speed(&mut self, hz: u32) -> Result<(), DriverError> {
        self.calls.push(RadioCall::SetSpiSpeed(hz));
        if self.fail_ops {
            Err(DriverError::SpiTransferFailed(-1))
        } else {
            Ok(())
        }
    }
}

// ── Event capture sink ────────────────────────────────────────

pub struct VecSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn rejections(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.events.iter().filter_map(|e| match e {
            AppEvent::CommandRejected { command, .. } => Some(*command),
            _ => None,
        })
    }

    pub fn driver_faults(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::DriverFault { .. }))
            .count()
    }

    pub fn last_radio_tlm(&self) -> Option<&lorarx::app::events::RadioTlm> {
        self.events.iter().rev().find_map(|e| match e {
            AppEvent::RadioTelemetry(t) => Some(t),
            _ => None,
        })
    }
}

impl Default for VecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
