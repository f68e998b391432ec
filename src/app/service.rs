//! Radio service — the command-validation and dispatch core.
//!
//! [`RadioService`] owns the radio configuration state and the
//! housekeeping counters. It exposes a clean, hardware-agnostic API; all
//! I/O flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  RadioCommand ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                   │       RadioService       │
//!     RadioPort ◀───│  validate · gate · apply │
//!                   └─────────────────────────┘
//! ```
//!
//! Every mutating command passes two gates, in a fixed order: the value
//! range check first (frequency, SPI speed), then the initialization
//! precondition. `SetLoRaParams` has only the initialization gate — the 13
//! parameter bytes are raw hardware codes with no firmware-side ranges.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::error::Error;

use super::commands::RadioCommand;
use super::events::{AppEvent, RadioTlm, StatusTlm};
use super::ports::{EventSink, RadioPort};
use super::state::{LoRaParams, RadioState, MAX_FREQUENCY_MHZ, MAX_SPI_SPEED_HZ};

// ───────────────────────────────────────────────────────────────
// RadioService
// ───────────────────────────────────────────────────────────────

/// The radio service orchestrates all command handling for the receive
/// radio endpoint.
pub struct RadioService {
    /// Static identity from start-up configuration: SPI device, pins,
    /// timing. Never mutated by commands.
    setup: SystemConfig,
    /// Live radio configuration plus the initialized gate.
    state: RadioState,
    valid_cmd_cnt: u16,
    invalid_cmd_cnt: u16,
    /// Driver failures observed after a state write was already applied.
    driver_fault_cnt: u16,
}

impl RadioService {
    /// Construct the service from configuration. The radio starts
    /// uninitialized; only an `InitRadio` command can arm the setters.
    pub fn new(setup: SystemConfig) -> Self {
        let state = RadioState::new(setup.initial_radio_config());
        Self {
            setup,
            state,
            valid_cmd_cnt: 0,
            invalid_cmd_cnt: 0,
            driver_fault_cnt: 0,
        }
    }

    // ── Command dispatch ──────────────────────────────────────

    /// Process one external command to completion.
    ///
    /// Returns `true` if the command was accepted. Rejections emit a
    /// [`AppEvent::CommandRejected`] carrying the typed reason and bump
    /// the invalid counter; nothing is retried and nothing panics.
    pub fn handle_command(
        &mut self,
        cmd: RadioCommand,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> bool {
        let result = match cmd {
            RadioCommand::Noop => self.noop(sink),
            RadioCommand::ResetStatus => self.reset_status(),
            RadioCommand::InitRadio => self.init_radio(radio, sink),
            RadioCommand::SendRadioTlm => self.send_radio_tlm(sink),
            RadioCommand::SetLoRaParams(params) => self.set_lora_params(params, radio, sink),
            RadioCommand::SetRadioFrequency(mhz) => self.set_radio_frequency(mhz, radio, sink),
            RadioCommand::SetSpiSpeed(hz) => self.set_spi_speed(hz, radio, sink),
        };

        match result {
            Ok(()) => {
                // The reset command does not count itself.
                if !matches!(cmd, RadioCommand::ResetStatus) {
                    self.valid_cmd_cnt = self.valid_cmd_cnt.wrapping_add(1);
                }
                true
            }
            Err(reason) => {
                self.invalid_cmd_cnt = self.invalid_cmd_cnt.wrapping_add(1);
                warn!("{} rejected: {}", cmd.name(), reason);
                sink.emit(&AppEvent::CommandRejected {
                    command: cmd.name(),
                    reason,
                });
                false
            }
        }
    }

    // ── Operations ────────────────────────────────────────────

    /// Liveness check.
    fn noop(&mut self, sink: &mut impl EventSink) -> Result<(), Error> {
        sink.emit(&AppEvent::Noop {
            version: env!("CARGO_PKG_VERSION"),
        });
        Ok(())
    }

    /// Clear reportable counters.
    ///
    /// The initialized gate is functional state, not a counter: a status
    /// reset must never silently re-arm (or disarm) the setters.
    fn reset_status(&mut self) -> Result<(), Error> {
        self.valid_cmd_cnt = 0;
        self.invalid_cmd_cnt = 0;
        self.driver_fault_cnt = 0;
        Ok(())
    }

    /// Bring up the radio from the configured SPI device and pins.
    ///
    /// `initialized` is set unconditionally from the driver's result: a
    /// failed re-init drops the system back to uninitialized even if a
    /// previous bring-up had succeeded, since the old hardware claim has
    /// already been released by then.
    fn init_radio(
        &mut self,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Error> {
        let result = radio.initialize(
            &self.setup.spi_dev_path,
            self.setup.spi_dev_num,
            &self.setup.radio_pins,
        );

        match result {
            Ok(()) => {
                self.state.initialized = true;
                info!("radio initialized on {}", self.setup.spi_dev_path);
                sink.emit(&AppEvent::RadioInitialized);
                Ok(())
            }
            Err(e) => {
                self.state.initialized = false;
                Err(Error::Driver(e))
            }
        }
    }

    /// Emit a telemetry snapshot of the full radio configuration.
    ///
    /// Always succeeds: it reports configuration, not live hardware
    /// status, so it is available in both states.
    fn send_radio_tlm(&mut self, sink: &mut impl EventSink) -> Result<(), Error> {
        sink.emit(&AppEvent::RadioTelemetry(self.build_radio_tlm()));
        Ok(())
    }

    /// Replace the LoRa modulation parameter set.
    ///
    /// The 13 bytes are accepted unvalidated once the radio is
    /// initialized; their legal ranges belong to the SX1280, not to this
    /// layer.
    fn set_lora_params(
        &mut self,
        params: LoRaParams,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Error> {
        if !self.state.initialized {
            return Err(Error::NotInitialized);
        }

        self.state.config.lora = params;
        self.forward(radio, sink, "SetLoRaParams", |r| {
            r.set_modulation_params(&params)
        });

        info!(
            "set LoRa params: SF={:#04x} BW={:#04x} CR={:#04x}",
            params.spreading_factor, params.bandwidth, params.coding_rate
        );
        sink.emit(&AppEvent::LoRaParamsSet {
            sf: params.spreading_factor,
            bw: params.bandwidth,
            cr: params.coding_rate,
        });
        Ok(())
    }

    /// Retune the RF centre frequency.
    ///
    /// Range check before the initialization gate: an out-of-range value
    /// is rejected identically in both states.
    fn set_radio_frequency(
        &mut self,
        freq_mhz: u32,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Error> {
        if freq_mhz > MAX_FREQUENCY_MHZ {
            return Err(Error::InvalidFrequency(freq_mhz));
        }
        if !self.state.initialized {
            return Err(Error::NotInitialized);
        }

        self.state.config.frequency_mhz = freq_mhz;
        // u64: 48 000 MHz exceeds u32 once expressed in Hz.
        let hz = u64::from(freq_mhz) * 1_000_000;
        self.forward(radio, sink, "SetRadioFrequency", |r| r.set_rf_frequency(hz));

        info!("set radio frequency to {} MHz", freq_mhz);
        sink.emit(&AppEvent::FrequencySet(freq_mhz));
        Ok(())
    }

    /// Reclock the SPI bus.
    fn set_spi_speed(
        &mut self,
        speed_hz: u32,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Error> {
        if speed_hz > MAX_SPI_SPEED_HZ {
            return Err(Error::InvalidSpiSpeed(speed_hz));
        }
        if !self.state.initialized {
            return Err(Error::NotInitialized);
        }

        self.state.config.spi_speed_hz = speed_hz;
        self.forward(radio, sink, "SetSpiSpeed", |r| r.set_spi_speed(speed_hz));

        info!("set SPI speed to {} Hz", speed_hz);
        sink.emit(&AppEvent::SpiSpeedSet(speed_hz));
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build the on-demand radio configuration snapshot: the current
    /// config plus the static device identity and pin assignment.
    pub fn build_radio_tlm(&self) -> RadioTlm {
        RadioTlm {
            spi_dev_path: self.setup.spi_dev_path.clone(),
            spi_dev_num: self.setup.spi_dev_num,
            spi_speed_hz: self.state.config.spi_speed_hz,
            radio_pins: self.setup.radio_pins,
            frequency_mhz: self.state.config.frequency_mhz,
            lora: self.state.config.lora,
        }
    }

    /// Build the periodic housekeeping snapshot.
    pub fn build_status_tlm(&self) -> StatusTlm {
        StatusTlm {
            valid_cmd_cnt: self.valid_cmd_cnt,
            invalid_cmd_cnt: self.invalid_cmd_cnt,
            driver_fault_cnt: self.driver_fault_cnt,
            radio_initialized: self.state.initialized,
        }
    }

    /// Whether the radio has been brought up.
    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    /// The live radio configuration.
    pub fn config(&self) -> &super::state::RadioConfig {
        &self.state.config
    }

    pub fn valid_cmd_cnt(&self) -> u16 {
        self.valid_cmd_cnt
    }

    pub fn invalid_cmd_cnt(&self) -> u16 {
        self.invalid_cmd_cnt
    }

    pub fn driver_fault_cnt(&self) -> u16 {
        self.driver_fault_cnt
    }

    // ── Internal ──────────────────────────────────────────────

    /// Forward an already-applied state change to the driver.
    ///
    /// The command's accept/reject decision was made on the state write;
    /// a driver failure here is counted and reported as a fault event but
    /// does not retroactively fail the command.
    fn forward<R: RadioPort>(
        &mut self,
        radio: &mut R,
        sink: &mut impl EventSink,
        command: &'static str,
        op: impl FnOnce(&mut R) -> Result<(), super::ports::DriverError>,
    ) {
        if let Err(error) = op(radio) {
            self.driver_fault_cnt = self.driver_fault_cnt.wrapping_add(1);
            warn!("{}: driver fault after state write: {}", command, error);
            sink.emit(&AppEvent::DriverFault { command, error });
        }
    }
}
